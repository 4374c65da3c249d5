//! Indicator outputs (alarm and tick LEDs).
//!
//! Purely observational. Nothing read back from an indicator ever feeds the
//! control loop, so a failed write is logged and forgotten.

use embedded_hal::digital::{OutputPin, PinState};

/// Visual side channel driven by the controller.
pub trait Indicators {
    /// Rain has been seen in the current reporting window.
    fn set_alarm(&mut self, on: bool);

    /// A tick is being processed.
    fn set_tick(&mut self, on: bool);
}

/// For hosts without LEDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIndicators;

impl Indicators for NoIndicators {
    fn set_alarm(&mut self, _on: bool) {}

    fn set_tick(&mut self, _on: bool) {}
}

/// Two LEDs on digital output pins.
#[derive(Debug)]
pub struct LedIndicators<A, T> {
    alarm: A,
    tick: T,
}

impl<A: OutputPin, T: OutputPin> LedIndicators<A, T> {
    /// Both LEDs are switched off on construction.
    pub fn new(alarm: A, tick: T) -> Self {
        let mut leds = Self { alarm, tick };
        leds.set_alarm(false);
        leds.set_tick(false);
        leds
    }

    pub fn release(self) -> (A, T) {
        (self.alarm, self.tick)
    }
}

impl<A: OutputPin, T: OutputPin> Indicators for LedIndicators<A, T> {
    fn set_alarm(&mut self, on: bool) {
        if let Err(e) = self.alarm.set_state(PinState::from(on)) {
            log::warn!("alarm led write failed: {e:?}");
        }
    }

    fn set_tick(&mut self, on: bool) {
        if let Err(e) = self.tick.set_state(PinState::from(on)) {
            log::warn!("tick led write failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};

    #[test]
    fn test_leds_start_off_and_follow_commands() {
        let alarm = Mock::new(&[
            Transaction::set(State::Low),
            Transaction::set(State::High),
        ]);
        let tick = Mock::new(&[
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);

        let mut leds = LedIndicators::new(alarm, tick);
        leds.set_alarm(true);
        leds.set_tick(true);
        leds.set_tick(false);

        let (mut alarm, mut tick) = leds.release();
        alarm.done();
        tick.done();
    }
}
