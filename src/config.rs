//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the rain-config.toml file.
//! It provides a centralized way to configure the gauge calibration, the control loop
//! timing, the startup clock value and the GPIO wiring.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::accumulator::DEFAULT_TENTHS_MM_PER_TICK;
use crate::clock::default_epoch;
use crate::debounce::DEFAULT_DEBOUNCE_MS;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rain-config.toml";

/// Application configuration loaded from rain-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Gauge calibration and control loop timing
    pub gauge: GaugeConfig,
    /// Startup clock value
    pub clock: ClockConfig,
    /// GPIO wiring, only used with the `hardware` feature
    pub hardware: HardwareConfig,
}

/// Gauge calibration and loop timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GaugeConfig {
    /// Minimum stable time before a raw transition is accepted
    pub debounce_ms: u64,
    /// Water depth per bucket tip, in tenths of a millimetre
    pub tenths_mm_per_tick: u32,
    /// Blocking settle time after each tick
    pub post_event_delay_ms: u64,
    /// Control loop period
    pub poll_interval_ms: u64,
    /// Length of the reporting window in minutes
    pub report_every_minutes: u32,
}

/// Real-time clock settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Value the clock is set to at startup, e.g. "2020-07-01T00:00:00"
    pub epoch: NaiveDateTime,
}

/// GPIO character-device wiring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HardwareConfig {
    /// GPIO chip device path
    pub chip: String,
    /// Line offset of the bucket contact
    pub rain_pin: u32,
    /// Line offset of the alarm LED
    pub alarm_led_pin: u32,
    /// Line offset of the tick LED
    pub tick_led_pin: u32,
    /// Contact drives the line high when closed (pull-down wiring)
    pub active_high: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gauge: GaugeConfig {
                debounce_ms: DEFAULT_DEBOUNCE_MS,
                tenths_mm_per_tick: DEFAULT_TENTHS_MM_PER_TICK,
                post_event_delay_ms: 500,
                poll_interval_ms: 10,
                report_every_minutes: 1,
            },
            clock: ClockConfig {
                epoch: default_epoch(),
            },
            hardware: HardwareConfig {
                chip: "/dev/gpiochip0".to_string(),
                rain_pin: 17,
                alarm_led_pin: 27,
                tick_led_pin: 22,
                active_high: true,
            },
        }
    }
}

impl GaugeConfig {
    pub fn post_event_delay(&self) -> Duration {
        Duration::from_millis(self.post_event_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from rain-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "loaded configuration: {} tenths mm/tick, {} min window",
                        config.gauge.tenths_mm_per_tick,
                        config.gauge.report_every_minutes
                    );
                    config
                }
                Err(e) => {
                    log::warn!("invalid config file format: {e}");
                    log::warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "no config file at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gauge.debounce_ms, 80);
        assert_eq!(config.gauge.tenths_mm_per_tick, 2);
        assert_eq!(config.gauge.post_event_delay_ms, 500);
        assert_eq!(config.gauge.report_every_minutes, 1);
        assert_eq!(config.clock.epoch, default_epoch());
        assert_eq!(config.hardware.chip, "/dev/gpiochip0");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_custom_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
[gauge]
debounce_ms = 50
tenths_mm_per_tick = 3
post_event_delay_ms = 250
poll_interval_ms = 5
report_every_minutes = 10

[clock]
epoch = "2023-03-01T06:30:00"

[hardware]
chip = "/dev/gpiochip4"
rain_pin = 5
alarm_led_pin = 6
tick_led_pin = 13
active_high = false
"#,
        )
        .unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.gauge.debounce_ms, 50);
        assert_eq!(config.gauge.tenths_mm_per_tick, 3);
        assert_eq!(config.gauge.report_every_minutes, 10);
        assert_eq!(
            config.clock.epoch.format("%Y-%m-%d %H:%M").to_string(),
            "2023-03-01 06:30"
        );
        assert!(!config.hardware.active_high);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[gauge]\ndebounce_ms = \"fast\"\n").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.gauge.tenths_mm_per_tick = 5;
        config.save_to_path(file.path()).unwrap();

        assert_eq!(Config::load_from_path(file.path()), config);
    }
}
