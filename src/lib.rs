//! # Rain Gauge Core Library
//!
//! This library turns the raw contact of a tipping-bucket rain sensor into a
//! debounced tick count and periodic, human-readable rainfall reports. It is
//! designed to run as a single cooperative control loop on small boards like
//! the Raspberry Pi Zero W, with every piece of hardware injected through a
//! small capability trait so the whole pipeline runs on a desktop too.
//!
//! ## Design Philosophy
//!
//! ### One Owner, No Globals
//! - **Single control thread**: the tick count, the debounced line state and
//!   the last reporting window all live inside one [`controller::RainEventController`]
//! - **Exclusive access**: every poll takes `&mut self`, so each piece of state
//!   has exactly one writer
//! - **No interrupts in the core**: a host that wants edge interrupts must hand
//!   raw edges over through a single-producer queue
//!
//! ### Exact Arithmetic
//! Depth is kept in tenths of a millimetre as an integer. A gauge that tips
//! 0.2 mm per bucket reports `1.0 mm` after five tips, never `0.99999 mm`.
//!
//! ## Data Flow
//! 1. **Poll**: read the raw line through [`sensor::RainSensor`]
//! 2. **Filter**: [`debounce::DebounceFilter`] accepts stable rising edges only
//! 3. **Accumulate**: [`accumulator::RainfallAccumulator`] counts ticks
//! 4. **Schedule**: [`scheduler::ReportScheduler`] detects a new reporting window
//! 5. **Report**: [`sink::ActuationSink`] receives event and report lines
//!
//! ## Core Types
//! - [`TickEvent`]: one accepted bucket tip
//! - [`Depth`]: rainfall depth in tenths of a millimetre

use std::fmt;

use serde::{Deserialize, Serialize};

// Module declarations
pub mod accumulator;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod indicator;
pub mod scheduler;
pub mod sensor;
pub mod simulation;
pub mod sink;

/// One accepted, debounced bucket tip.
///
/// Carries the monotonic time (milliseconds of uptime) at which the filter
/// accepted the rising edge.
///
/// # Example
/// ```
/// use rain_gauge_lib::TickEvent;
///
/// let tick = TickEvent { accepted_at_ms: 180 };
/// assert_eq!(tick.accepted_at_ms, 180);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEvent {
    /// Uptime in milliseconds when the edge became stable
    pub accepted_at_ms: u64,
}

/// Rainfall depth in tenths of a millimetre.
///
/// Computed from a tick count with exact integer arithmetic and rendered as
/// `<integer>.<one decimal> mm`, the format existing log consumers expect.
///
/// # Example
/// ```
/// use rain_gauge_lib::Depth;
///
/// let depth = Depth::from_ticks(5, 2);
/// assert_eq!(depth.tenths_mm(), 10);
/// assert_eq!(depth.to_string(), "1.0 mm");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Depth(u32);

impl Depth {
    /// Convert a tick count into a depth.
    ///
    /// Overflow is out of scope given realistic tip rates; the multiply
    /// saturates instead of wrapping.
    pub fn from_ticks(ticks: u32, tenths_mm_per_tick: u32) -> Self {
        Depth(ticks.saturating_mul(tenths_mm_per_tick))
    }

    pub fn from_tenths_mm(tenths: u32) -> Self {
        Depth(tenths)
    }

    pub fn tenths_mm(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} mm", self.0 / 10, self.0 % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_renders_one_decimal() {
        assert_eq!(Depth::from_ticks(2, 2).to_string(), "0.4 mm");
        assert_eq!(Depth::from_ticks(5, 2).to_string(), "1.0 mm");
        assert_eq!(Depth::from_ticks(0, 2).to_string(), "0.0 mm");
        assert_eq!(Depth::from_ticks(63, 2).to_string(), "12.6 mm");
    }

    #[test]
    fn test_depth_saturates() {
        let depth = Depth::from_ticks(u32::MAX, 2);
        assert_eq!(depth.tenths_mm(), u32::MAX);
    }
}
