//! # Report Scheduler
//!
//! Decides when the accumulated rainfall should be flushed. The scheduler is
//! edge-triggered on the clock's time unit (a minute, or a bucket of several
//! minutes): it fires once when the unit changes and stays quiet for every
//! further poll inside the same unit, no matter how often the control loop
//! asks.
//!
//! At startup there is no previous unit. The first observation only becomes
//! the baseline; the scheduler never fires on its first call.

/// Edge-triggered detector for reporting window boundaries.
#[derive(Clone, Debug, Default)]
pub struct ReportScheduler {
    last_unit: Option<u32>,
}

impl ReportScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once for each new time unit.
    pub fn has_window_elapsed(&mut self, current_unit: u32) -> bool {
        match self.last_unit {
            None => {
                log::debug!("report window baseline set to unit {current_unit}");
                self.last_unit = Some(current_unit);
                false
            }
            Some(last) if last == current_unit => false,
            Some(last) => {
                log::debug!("report window boundary crossed: {last} -> {current_unit}");
                self.last_unit = Some(current_unit);
                true
            }
        }
    }

    /// Unit at which the scheduler last fired, or its baseline.
    pub fn last_unit(&self) -> Option<u32> {
        self.last_unit
    }
}
