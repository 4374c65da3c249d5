//! Rainfall accumulator: counts debounced ticks between reports.

use crate::Depth;

/// Default calibration: two tenths of a millimetre of water per bucket tip.
pub const DEFAULT_TENTHS_MM_PER_TICK: u32 = 2;

/// Tick counter for the current reporting window.
///
/// The count only ever grows through [`accumulate`](Self::accumulate) and
/// only ever drops back to zero through [`snapshot_and_reset`](Self::snapshot_and_reset).
#[derive(Clone, Debug)]
pub struct RainfallAccumulator {
    count: u32,
    tenths_mm_per_tick: u32,
}

impl RainfallAccumulator {
    pub fn new(tenths_mm_per_tick: u32) -> Self {
        Self {
            count: 0,
            tenths_mm_per_tick,
        }
    }

    /// Record one tick.
    pub fn accumulate(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Return the ticks counted since the previous snapshot and start over at zero.
    pub fn snapshot_and_reset(&mut self) -> u32 {
        std::mem::take(&mut self.count)
    }

    /// Ticks counted so far in this window.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Depth represented by `ticks`, using this gauge's calibration.
    pub fn depth_of(&self, ticks: u32) -> Depth {
        Depth::from_ticks(ticks, self.tenths_mm_per_tick)
    }

    pub fn tenths_mm_per_tick(&self) -> u32 {
        self.tenths_mm_per_tick
    }
}

impl Default for RainfallAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_TENTHS_MM_PER_TICK)
    }
}
