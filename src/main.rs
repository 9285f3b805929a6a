//! # Temperature Telemetry Entry Point
//!
//! Runs the threaded pipeline with the random ADC simulation:
//! sampler thread → shared cell → forwarder thread (UART on stdout + CSV log).
//!
//! ## Configuration
//! No flags. `TELEMETRY_PERIOD_MS`, `TELEMETRY_LOG_PATH` and `TELEMETRY_RUN_SECS`
//! override the defaults (1 s, `sensor_data.csv`, run until Ctrl-C).
//! Diagnostics go through `RUST_LOG` (e.g. `RUST_LOG=info`).
//!
//! ## Shutdown
//! Ctrl-C or the configured run time cancels both tasks, drains the cell,
//! prints the final counters and exits with status 0.

use std::{process, time::Duration};

use log::{error, info, warn};
use temp_telemetry::{Config, Pipeline, SimulatedAdc, component_b::output::UartConsole};
use tokio::signal;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    info!("=== TEMPERATURE TELEMETRY START ===");
    println!("TEMPERATURE SENSOR SIMULATION\n");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; falling back to defaults", e);
            Config::default()
        }
    };

    let pipeline = match Pipeline::start(
        &config,
        SimulatedAdc::from_entropy(),
        UartConsole::stdout(),
    ) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("failed to start pipeline: {}", e);
            process::exit(1);
        }
    };

    wait_for_stop(config.run_for).await;

    let stats = match tokio::task::spawn_blocking(move || pipeline.shutdown()).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("shutdown task failed: {}", e);
            process::exit(1);
        }
    };
    stats.log_summary();

    println!(
        "\nStopped: {} readings forwarded, {} logged to {}",
        stats.forwarder.forwarded,
        stats.forwarder.logged,
        config.log_path.display()
    );
    info!("=== TEMPERATURE TELEMETRY FINISHED ===");
}

/// Resolves on Ctrl-C, or when `run_for` elapses if set.
async fn wait_for_stop(run_for: Option<Duration>) {
    match run_for {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => info!("[Main] run time of {:?} elapsed", limit),
                res = signal::ctrl_c() => log_ctrl_c(res),
            }
        }
        None => log_ctrl_c(signal::ctrl_c().await),
    }
}

fn log_ctrl_c(res: std::io::Result<()>) {
    match res {
        Ok(()) => info!("[Main] Ctrl-C received"),
        Err(e) => error!("[Main] cannot listen for Ctrl-C: {}", e),
    }
}
