//! # Simulated Gauge
//!
//! Development mode without hardware. A [`ScriptedSensor`] replays bucket
//! tips against a [`ManualClock`], including the contact chatter a real reed
//! switch produces, so the full controller (debounce, settle delay, window
//! flushes) runs at full speed on a desktop.
//!
//! Each scripted tip looks like this on the raw line:
//!
//! ```text
//!         at_ms
//!           |<- chatter ->|<--- closed --->|
//! low ______|-_-_-_-_-_-_-|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|________ low
//! ```

use std::io::Write;
use std::time::Duration;

use crate::clock::{Clock, ManualClock};
use crate::config::Config;
use crate::controller::RainEventController;
use crate::indicator::NoIndicators;
use crate::sensor::RainSensor;
use crate::sink::SerialSink;

/// Half-period of the simulated contact chatter.
const CHATTER_HALF_PERIOD_MS: u64 = 4;

/// One physical bucket tip on the scripted timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketTip {
    /// Uptime at which the contact first moves
    pub at_ms: u64,
    /// Duration of the bouncing phase
    pub chatter_ms: u64,
    /// Duration the contact then stays closed
    pub closed_ms: u64,
}

impl BucketTip {
    /// A typical tip: 30 ms of chatter followed by 120 ms closed.
    pub fn at(at_ms: u64) -> Self {
        Self {
            at_ms,
            chatter_ms: 30,
            closed_ms: 120,
        }
    }

    fn level(&self, now_ms: u64) -> Option<bool> {
        let rel = now_ms.checked_sub(self.at_ms)?;
        if rel < self.chatter_ms {
            Some((rel / CHATTER_HALF_PERIOD_MS) % 2 == 0)
        } else if rel < self.chatter_ms + self.closed_ms {
            Some(true)
        } else {
            None
        }
    }
}

/// `count` evenly spaced tips starting at `start_ms`.
pub fn rain_shower(start_ms: u64, count: usize, spacing_ms: u64) -> Vec<BucketTip> {
    (0..count as u64)
        .map(|i| BucketTip::at(start_ms + i * spacing_ms))
        .collect()
}

/// Sensor that replays a tip script against a shared manual clock.
#[derive(Clone, Debug)]
pub struct ScriptedSensor {
    clock: ManualClock,
    tips: Vec<BucketTip>,
}

impl ScriptedSensor {
    pub fn new(clock: ManualClock, mut tips: Vec<BucketTip>) -> Self {
        tips.sort_by_key(|tip| tip.at_ms);
        Self { clock, tips }
    }
}

impl RainSensor for ScriptedSensor {
    fn read_raw_line(&mut self) -> bool {
        let now = self.clock.uptime_ms();
        self.tips
            .iter()
            .take_while(|tip| tip.at_ms <= now)
            .find_map(|tip| tip.level(now))
            .unwrap_or(false)
    }
}

/// Totals from a simulated run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub ticks: u32,
    pub reports: u32,
    pub reported_tenths_mm: u32,
    /// Ticks still waiting for the next window when the run ended
    pub pending_ticks: u32,
}

/// Drive a controller with `tips` for `duration` of simulated time, writing
/// event and report lines to `out`.
pub fn run_simulation<W: Write>(
    config: &Config,
    tips: Vec<BucketTip>,
    duration: Duration,
    out: W,
) -> SimulationSummary {
    let clock = ManualClock::new(config.clock.epoch, config.gauge.report_every_minutes);
    let sensor = ScriptedSensor::new(clock.clone(), tips);
    let mut controller = RainEventController::new(
        &config.gauge,
        sensor,
        clock,
        SerialSink::new(out),
        NoIndicators,
    );

    let end_ms = duration.as_millis() as u64;
    let mut summary = SimulationSummary::default();
    controller.run_until(|ctrl, outcome| {
        if outcome.tick.is_some() {
            summary.ticks += 1;
        }
        if let Some(depth) = outcome.report {
            summary.reports += 1;
            summary.reported_tenths_mm += depth.tenths_mm();
        }
        ctrl.clock().uptime_ms() >= end_ms
    });
    summary.pending_ticks = controller.pending_ticks();

    log::info!(
        "simulation finished: {} ticks, {} reports",
        summary.ticks,
        summary.reports
    );
    summary
}
