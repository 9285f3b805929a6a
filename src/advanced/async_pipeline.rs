//! Async sampler → forwarder pipeline: tokio-based alternative to the threaded one.
//!
//! Both tasks share one `AsyncSharedCell`. The sampler stops on a `watch`
//! channel selected against its interval tick; the forwarder stops when the
//! cell is closed and drained, so a pending reading is never dropped.
//! The forwarder's UART and log writes stay synchronous; at one record per
//! period they are short enough to run inline on the worker.

use std::{sync::Arc, time::Duration};

use log::{error, info, warn};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::advanced::async_cell::AsyncSharedCell;
use crate::component_a::sensor::{Reading, ReadingSource};
use crate::component_b::{
    forwarder::{Forwarder, ForwarderStats},
    output::OutputSink,
};
use crate::config::Config;
use crate::utils::{csv_log::CsvLog, metrics::PipelineStats};

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Periodic producer; returns when `shutdown` flips to true or its sender drops.
pub async fn async_sampler<S: ReadingSource>(
    mut source: S,
    cell: Arc<AsyncSharedCell>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("[AsyncSampler] task started, period={:?}", period);
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !stop_requested(&shutdown) {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => break,
        }

        let temperature = source.read_temperature();
        if !temperature.is_finite() {
            warn!("[AsyncSampler] source returned {temperature}, sample dropped");
            continue;
        }
        cell.publish(Reading::now(temperature));
    }

    info!("[AsyncSampler] stopped");
}

/// Consumer; returns once the cell is closed and empty.
pub async fn async_forwarder<O: OutputSink>(
    mut forwarder: Forwarder<O>,
    cell: Arc<AsyncSharedCell>,
) -> ForwarderStats {
    info!("[AsyncForwarder] task started");

    while let Some(reading) = cell.take().await {
        forwarder.forward(reading);
    }

    info!("[AsyncForwarder] stopped");
    forwarder.stats()
}

pub struct AsyncPipeline {
    cell: Arc<AsyncSharedCell>,
    shutdown: watch::Sender<bool>,
    sampler: JoinHandle<()>,
    forwarder: JoinHandle<ForwarderStats>,
}

impl AsyncPipeline {
    /// Resets the log and spawns both tasks on the current runtime.
    pub fn spawn<S, O>(config: &Config, source: S, sink: O) -> Self
    where
        S: ReadingSource + 'static,
        O: OutputSink + 'static,
    {
        let log = CsvLog::new(&config.log_path);
        if let Err(e) = log.reset() {
            error!("[AsyncPipeline] failed to reset log: {}", e);
        }

        let cell = Arc::new(AsyncSharedCell::new());
        let (shutdown, shutdown_rx) = watch::channel(false);

        let sampler = tokio::spawn(async_sampler(
            source,
            cell.clone(),
            config.period,
            shutdown_rx,
        ));
        let forwarder = tokio::spawn(async_forwarder(Forwarder::new(sink, log), cell.clone()));

        Self {
            cell,
            shutdown,
            sampler,
            forwarder,
        }
    }

    pub async fn shutdown(self) -> PipelineStats {
        info!("[AsyncPipeline] shutting down...");
        let _ = self.shutdown.send(true);
        if let Err(e) = self.sampler.await {
            error!("[AsyncPipeline] sampler task failed: {}", e);
        }

        // Sampler is gone: the forwarder drains what is pending, then exits
        self.cell.close();
        let forwarder = match self.forwarder.await {
            Ok(stats) => stats,
            Err(e) => {
                error!("[AsyncPipeline] forwarder task failed: {}", e);
                ForwarderStats::default()
            }
        };

        PipelineStats::new(self.cell.stats(), forwarder)
    }
}
