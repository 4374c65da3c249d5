//! # Real-Time Clock
//!
//! The gauge has no battery-backed RTC. Like the board it was built for, the
//! clock is set once at startup to a fixed epoch and then free-runs from the
//! monotonic timer. The core only reads it.
//!
//! Two implementations are provided:
//! - [`SystemClock`]: epoch + `std::time::Instant`, sleeps with the thread
//! - [`ManualClock`]: time only moves when told to; sleeping advances it
//!   instantly, so the control loop runs without real waiting in tests and in
//!   simulation mode

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDateTime};

/// 2020-07-01 00:00:00, the start value the gauge firmware has always used.
pub const DEFAULT_EPOCH_SECS: i64 = 1_593_561_600;

/// Time source consumed by the controller.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Reporting unit the current time falls in.
    fn current_time_unit(&self) -> u32;

    /// Monotonic milliseconds since the clock was started.
    fn uptime_ms(&self) -> u64;

    /// Block the control loop for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// The epoch every clock starts from unless configured otherwise.
pub fn default_epoch() -> NaiveDateTime {
    DateTime::from_timestamp(DEFAULT_EPOCH_SECS, 0)
        .expect("default epoch should be in range")
        .naive_utc()
}

/// Bucket `ts` into windows of `minutes_per_unit` whole minutes.
///
/// Windows are aligned on the Unix epoch, so one-minute windows change
/// exactly on the minute and ten-minute windows on `:00`, `:10`, ...
pub fn minute_bucket(ts: NaiveDateTime, minutes_per_unit: u32) -> u32 {
    let minutes = ts.and_utc().timestamp().div_euclid(60);
    let unit = minutes.div_euclid(i64::from(minutes_per_unit.max(1)));
    unit as u32
}

fn offset(epoch: NaiveDateTime, elapsed_ms: u64) -> NaiveDateTime {
    let elapsed = chrono::Duration::milliseconds(elapsed_ms as i64);
    epoch + elapsed
}

/// Free-running clock started at a fixed epoch.
#[derive(Debug)]
pub struct SystemClock {
    epoch: NaiveDateTime,
    started: Instant,
    minutes_per_unit: u32,
}

impl SystemClock {
    pub fn new(epoch: NaiveDateTime, minutes_per_unit: u32) -> Self {
        log::info!("clock set to {}", epoch.format("%Y-%m-%d %H:%M:%S"));
        Self {
            epoch,
            started: Instant::now(),
            minutes_per_unit,
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        offset(self.epoch, self.uptime_ms())
    }

    fn current_time_unit(&self) -> u32 {
        minute_bucket(self.now(), self.minutes_per_unit)
    }

    fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that advances only through [`advance`](Self::advance) or `sleep`.
///
/// Clones share the same time, so a test can keep a handle while the
/// controller owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    epoch: NaiveDateTime,
    elapsed_ms: Rc<Cell<u64>>,
    minutes_per_unit: u32,
}

impl ManualClock {
    pub fn new(epoch: NaiveDateTime, minutes_per_unit: u32) -> Self {
        Self {
            epoch,
            elapsed_ms: Rc::new(Cell::new(0)),
            minutes_per_unit,
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.advance_ms(duration.as_millis() as u64);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ms);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(default_epoch(), 1)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        offset(self.epoch, self.elapsed_ms.get())
    }

    fn current_time_unit(&self) -> u32 {
        minute_bucket(self.now(), self.minutes_per_unit)
    }

    fn uptime_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}
