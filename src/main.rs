//! # Rain Gauge Application Entry Point
//!
//! This binary crate wires the gauge together: configuration, logging, the
//! board collaborators and the control loop. It supports both production mode
//! (GPIO lines on a Linux board) and development mode (scripted rain on a
//! simulated clock).
//!
//! Event and report lines go to stdout; diagnostics go to stderr through
//! `env_logger` (`RUST_LOG=debug` shows every debounce decision).

// Test modules
#[cfg(test)]
mod tests;

#[cfg(all(target_os = "linux", feature = "hardware"))]
mod board;

use std::env;
use std::time::Duration;

use anyhow::Context;
use rain_gauge_lib::config::Config;
use rain_gauge_lib::simulation::{rain_shower, run_simulation};

/// Length of the development-mode run.
const SIMULATION_MINUTES: u64 = 3;

/// Command line options.
#[derive(Debug, Default, PartialEq)]
struct Args {
    simulate: bool,
    config_path: Option<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--simulate" => parsed.simulate = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config_path = Some(path);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

/// Development mode: a shower of tips every 15 s on a simulated clock.
fn simulate(config: &Config) -> anyhow::Result<()> {
    let tips = rain_shower(5_000, 10, 15_000);
    let summary = run_simulation(
        config,
        tips,
        Duration::from_secs(SIMULATION_MINUTES * 60),
        std::io::stdout(),
    );
    log::info!(
        "simulated {} ticks, {} reports, {} tenths mm reported",
        summary.ticks,
        summary.reports,
        summary.reported_tenths_mm
    );
    Ok(())
}

/// Production mode: run the control loop on the configured GPIO lines forever.
#[cfg(all(target_os = "linux", feature = "hardware"))]
fn run_production(config: &Config) -> anyhow::Result<()> {
    use rain_gauge_lib::clock::SystemClock;
    use rain_gauge_lib::controller::RainEventController;
    use rain_gauge_lib::sink::SerialSink;

    let (sensor, leds) = board::bind(&config.hardware).context("binding gpio lines")?;
    let clock = SystemClock::new(config.clock.epoch, config.gauge.report_every_minutes);
    let sink = SerialSink::new(std::io::stdout());

    let mut controller = RainEventController::new(&config.gauge, sensor, clock, sink, leds);
    log::info!("rain gauge running");
    controller.run_until(|_, _| false);
    Ok(())
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn run_production(config: &Config) -> anyhow::Result<()> {
    log::warn!("GPIO support not enabled. Rebuild with --features hardware on Linux.");
    log::warn!("Running the simulated gauge instead:");
    simulate(config)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(env::args().skip(1))?;
    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    // Development mode: scripted rain, no hardware
    if args.simulate {
        return simulate(&config);
    }

    run_production(&config)
}
