//! # Debounce Filter
//!
//! The reed switch inside a tipping bucket chatters for a few tens of
//! milliseconds every time the bucket flips. This filter turns that noisy
//! line into clean logical transitions:
//!
//! - Every change of the raw line (re)arms a timer
//! - The change is accepted only once the line has stayed put for the full
//!   debounce interval
//! - Only accepted rising edges (dry → raining) produce a [`TickEvent`]
//!
//! A line that keeps oscillating faster than the interval never produces an
//! event. That burst is suppressed on purpose and is not recovered later.

use crate::TickEvent;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 80;

/// Time-based debounce filter for the raw sensor line.
#[derive(Clone, Debug)]
pub struct DebounceFilter {
    interval_ms: u64,
    /// Accepted logical state (`true` = raining)
    stable: bool,
    /// Last raw value observed
    candidate: bool,
    /// When `candidate` was first seen
    changed_at_ms: u64,
}

impl DebounceFilter {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            stable: false,
            candidate: false,
            changed_at_ms: 0,
        }
    }

    /// Feed one raw sample taken at `now_ms` of uptime.
    ///
    /// Returns a [`TickEvent`] exactly once per accepted rising edge.
    pub fn poll(&mut self, raw: bool, now_ms: u64) -> Option<TickEvent> {
        if raw != self.candidate {
            if self.candidate != self.stable {
                log::debug!(
                    "bounce rejected after {} ms",
                    now_ms.saturating_sub(self.changed_at_ms)
                );
            }
            self.candidate = raw;
            self.changed_at_ms = now_ms;
            return None;
        }

        if self.candidate == self.stable {
            return None;
        }

        if now_ms.saturating_sub(self.changed_at_ms) < self.interval_ms {
            return None;
        }

        self.stable = self.candidate;
        log::debug!("line settled {}", if self.stable { "high" } else { "low" });

        self.stable.then_some(TickEvent {
            accepted_at_ms: now_ms,
        })
    }

    /// Debounced line state.
    pub fn is_raining(&self) -> bool {
        self.stable
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl Default for DebounceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
