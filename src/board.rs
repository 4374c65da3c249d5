// src/board.rs
//! GPIO character-device binding for the gauge: one input line for the bucket
//! contact, two output lines for the LEDs.

use linux_embedded_hal::gpio_cdev::{self, Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use rain_gauge_lib::config::HardwareConfig;
use rain_gauge_lib::indicator::LedIndicators;
use rain_gauge_lib::sensor::PinSensor;
use thiserror::Error;

const CONSUMER: &str = "rain-gauge";

#[derive(Error, Debug)]
pub enum GpioError {
    #[error("open {path}: {source}")]
    Chip {
        path: String,
        #[source]
        source: gpio_cdev::errors::Error,
    },

    #[error("request line {offset}: {source}")]
    Line {
        offset: u32,
        #[source]
        source: gpio_cdev::errors::Error,
    },
}

pub type BoardSensor = PinSensor<CdevPin>;
pub type BoardLeds = LedIndicators<CdevPin, CdevPin>;

fn request(chip: &mut Chip, offset: u32, flags: LineRequestFlags) -> Result<CdevPin, GpioError> {
    let handle = chip
        .get_line(offset)
        .and_then(|line| line.request(flags, 0, CONSUMER))
        .map_err(|source| GpioError::Line { offset, source })?;
    CdevPin::new(handle).map_err(|source| GpioError::Line { offset, source })
}

pub fn bind(hw: &HardwareConfig) -> Result<(BoardSensor, BoardLeds), GpioError> {
    let mut chip = Chip::new(&hw.chip).map_err(|source| GpioError::Chip {
        path: hw.chip.clone(),
        source,
    })?;

    let rain = request(&mut chip, hw.rain_pin, LineRequestFlags::INPUT)?;
    let alarm = request(&mut chip, hw.alarm_led_pin, LineRequestFlags::OUTPUT)?;
    let tick = request(&mut chip, hw.tick_led_pin, LineRequestFlags::OUTPUT)?;

    log::info!(
        "bound {}: rain={} alarm={} tick={}",
        hw.chip,
        hw.rain_pin,
        hw.alarm_led_pin,
        hw.tick_led_pin
    );

    Ok((
        PinSensor::new(rain, hw.active_high),
        LedIndicators::new(alarm, tick),
    ))
}
