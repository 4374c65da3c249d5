//! # Rain Event Controller
//!
//! The state machine that ties the gauge together. Each call to
//! [`RainEventController::step`] is one control-loop iteration made of two
//! independent sub-cycles:
//!
//! ### Event cycle (`Idle → TickDetected → Idle`)
//! 1. Read the raw line and feed it to the [`DebounceFilter`]
//! 2. On an accepted rising edge: count the tick, send the
//!    `" - Rain detected"` line, light both indicators
//! 3. [`settle`](RainEventController::settle): block for the post-event delay
//!    so the tail of the same tip cannot retrigger, then drop the tick LED
//!
//! ### Report cycle (`WaitingForWindow → ReportFlushed → WaitingForWindow`)
//! 1. Ask the [`ReportScheduler`] whether the clock entered a new unit
//! 2. If so: snapshot-and-reset the count, convert to depth, send the report
//!    line and clear the alarm LED
//!
//! Sink failures are logged and dropped. The tick count is the authoritative
//! record; a lost line does not change it and is never retried.

use std::time::Duration;

use crate::accumulator::RainfallAccumulator;
use crate::clock::Clock;
use crate::config::GaugeConfig;
use crate::debounce::DebounceFilter;
use crate::indicator::Indicators;
use crate::scheduler::ReportScheduler;
use crate::sensor::RainSensor;
use crate::sink::{ActuationSink, RAIN_DETECTED_TAG};
use crate::{Depth, TickEvent};

/// What a single control-loop iteration did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// A tick was accepted in this iteration
    pub tick: Option<TickEvent>,
    /// A report was flushed with this depth
    pub report: Option<Depth>,
}

/// Owns every piece of mutable gauge state and all collaborators.
pub struct RainEventController<S, C, A, I> {
    sensor: S,
    clock: C,
    sink: A,
    indicators: I,
    filter: DebounceFilter,
    accumulator: RainfallAccumulator,
    scheduler: ReportScheduler,
    post_event_delay: Duration,
    poll_interval: Duration,
}

impl<S, C, A, I> RainEventController<S, C, A, I>
where
    S: RainSensor,
    C: Clock,
    A: ActuationSink,
    I: Indicators,
{
    pub fn new(gauge: &GaugeConfig, sensor: S, clock: C, sink: A, indicators: I) -> Self {
        Self {
            sensor,
            clock,
            sink,
            indicators,
            filter: DebounceFilter::new(gauge.debounce_ms),
            accumulator: RainfallAccumulator::new(gauge.tenths_mm_per_tick),
            scheduler: ReportScheduler::new(),
            post_event_delay: gauge.post_event_delay(),
            poll_interval: gauge.poll_interval(),
        }
    }

    /// Run one control-loop iteration.
    pub fn step(&mut self) -> StepOutcome {
        let tick = self.poll_sensor();
        if tick.is_some() {
            self.settle();
        }
        let report = self.check_report();
        StepOutcome { tick, report }
    }

    /// Event cycle: sample, debounce and, on a tick, count and announce it.
    pub fn poll_sensor(&mut self) -> Option<TickEvent> {
        let raw = self.sensor.read_raw_line();
        let tick = self.filter.poll(raw, self.clock.uptime_ms())?;

        self.accumulator.accumulate();
        log::info!(
            "rain tick accepted ({} pending)",
            self.accumulator.count()
        );

        if let Err(e) = self.sink.notify_event(self.clock.now(), RAIN_DETECTED_TAG) {
            log::warn!("rain event not delivered: {e}");
        }
        self.indicators.set_alarm(true);
        self.indicators.set_tick(true);

        Some(tick)
    }

    /// Post-event suspension step.
    ///
    /// Blocks the loop for the configured delay and is not cancellable.
    pub fn settle(&mut self) {
        self.clock.sleep(self.post_event_delay);
        self.indicators.set_tick(false);
    }

    /// Report cycle: flush the accumulated depth when a new window starts.
    pub fn check_report(&mut self) -> Option<Depth> {
        let unit = self.clock.current_time_unit();
        if !self.scheduler.has_window_elapsed(unit) {
            return None;
        }

        let ticks = self.accumulator.snapshot_and_reset();
        let depth = self.accumulator.depth_of(ticks);
        log::info!("reporting {depth} from {ticks} ticks");

        if let Err(e) = self.sink.notify_report(self.clock.now(), depth) {
            log::warn!("rainfall report not delivered: {e}");
        }
        self.indicators.set_alarm(false);

        Some(depth)
    }

    /// Loop until `stop` returns true, sleeping one poll interval per iteration.
    pub fn run_until<F>(&mut self, mut stop: F)
    where
        F: FnMut(&Self, &StepOutcome) -> bool,
    {
        loop {
            let outcome = self.step();
            if stop(self, &outcome) {
                break;
            }
            self.clock.sleep(self.poll_interval);
        }
    }

    /// Ticks counted in the current window.
    pub fn pending_ticks(&self) -> u32 {
        self.accumulator.count()
    }

    /// Debounced sensor state.
    pub fn is_raining(&self) -> bool {
        self.filter.is_raining()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }
}
