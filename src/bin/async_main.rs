//! Async pipeline: tokio-task alternative to the threaded binary (async_main).
//!
//! Same data flow and configuration as `temp_telemetry`, but the sampler and the
//! forwarder are two tasks on one cooperative runtime sharing an `AsyncSharedCell`.

use log::{error, info, warn};
use temp_telemetry::{
    Config, SimulatedAdc, advanced::async_pipeline::AsyncPipeline,
    component_b::output::UartConsole,
};
use tokio::signal;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    println!("=== ASYNC TELEMETRY START ===");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; falling back to defaults", e);
            Config::default()
        }
    };

    let pipeline =
        AsyncPipeline::spawn(&config, SimulatedAdc::from_entropy(), UartConsole::stdout());

    match config.run_for {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => info!("[Main] run time of {:?} elapsed", limit),
                res = signal::ctrl_c() => {
                    if let Err(e) = res {
                        error!("[Main] cannot listen for Ctrl-C: {}", e);
                    }
                }
            }
        }
        None => {
            if let Err(e) = signal::ctrl_c().await {
                error!("[Main] cannot listen for Ctrl-C: {}", e);
            }
        }
    }

    println!("Stopping async pipeline...");
    let stats = pipeline.shutdown().await;
    stats.log_summary();

    println!("=== ASYNC TELEMETRY FINISHED ===");
}
