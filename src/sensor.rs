//! Raw sensor input.
//!
//! The controller only needs to know whether the bucket contact is closed
//! right now. [`PinSensor`] adapts any `embedded-hal` input pin, so the same
//! core runs against a Linux GPIO line, a microcontroller pin or a mock.

use embedded_hal::digital::InputPin;

/// Instantaneous state of the tipping-bucket contact.
pub trait RainSensor {
    /// `true` while the contact is closed.
    fn read_raw_line(&mut self) -> bool;
}

/// Rain sensor wired to a digital input pin.
#[derive(Debug)]
pub struct PinSensor<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> PinSensor<P> {
    /// `active_high` is true for a pulled-down contact that drives the line high.
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> RainSensor for PinSensor<P> {
    fn read_raw_line(&mut self) -> bool {
        let level = if self.active_high {
            self.pin.is_high()
        } else {
            self.pin.is_low()
        };
        level.unwrap_or_else(|e| {
            log::warn!("rain pin read failed: {e:?}");
            false
        })
    }
}
