//! # Temperature Telemetry Pipeline
//!
//! A sampler task periodically reads a (simulated) thermistor and hands each
//! reading to a forwarder task, which sends it over a (simulated) UART and
//! appends it to a CSV log.
//!
//! ## Key Architecture
//! - **Sampler:** fixed-period producer, pluggable `ReadingSource`.
//! - **SharedCell:** single slot + readiness signal; latest value wins.
//! - **Forwarder:** waits on the cell, renders, emits, logs (best effort).
//!
//! ## Concurrency
//! - Threaded pipeline (`pipeline::Pipeline`): mutex + condvar monitor.
//! - Cooperative pipeline (`advanced::async_pipeline`): tokio tasks, `Notify`.
//! - Shutdown is observed at every suspension point: sampler sleep, cell wait.

pub mod advanced;
pub mod component_a;
pub mod component_b;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod utils;

pub use component_a::sensor::{Reading, ReadingSource, ScriptedAdc, SimulatedAdc};
pub use component_a::shared_cell::SharedCell;
pub use config::Config;
pub use error::{ConfigError, LogError};
pub use pipeline::Pipeline;
