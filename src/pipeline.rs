//! Threaded pipeline: sampler thread → shared cell → forwarder thread.
//!
//! `Pipeline::start` truncates the log, then spawns both tasks. `shutdown` fires
//! the cancellation token (wakes the sampler sleep), closes the cell (wakes the
//! forwarder wait) and joins both threads.

use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{error, info, warn};

use crate::component_a::{sampler::Sampler, sensor::ReadingSource, shared_cell::SharedCell};
use crate::component_b::{
    forwarder::{Forwarder, ForwarderStats},
    output::OutputSink,
};
use crate::config::Config;
use crate::utils::{csv_log::CsvLog, metrics::PipelineStats, shutdown::Shutdown};

pub struct Pipeline {
    cell: Arc<SharedCell>,
    shutdown: Shutdown,
    sampler: JoinHandle<()>,
    forwarder: JoinHandle<ForwarderStats>,
}

impl Pipeline {
    /// Resets the log and starts both tasks.
    ///
    /// A log that cannot be reset is reported and the pipeline starts anyway;
    /// the forwarder will report each failed append. Only a failure to spawn a
    /// thread is returned.
    pub fn start<S, O>(config: &Config, source: S, sink: O) -> io::Result<Self>
    where
        S: ReadingSource + 'static,
        O: OutputSink + 'static,
    {
        let log = CsvLog::new(&config.log_path);
        if let Err(e) = log.reset() {
            error!("[Pipeline] failed to reset log: {}", e);
        }

        let cell = Arc::new(SharedCell::new());
        let shutdown = Shutdown::new();

        let forwarder = {
            let cell = cell.clone();
            thread::Builder::new()
                .name("forwarder".into())
                .spawn(move || Forwarder::new(sink, log).run(&cell))?
        };

        let sampler = {
            let cell_s = cell.clone();
            let shutdown_s = shutdown.clone();
            let period = config.period;
            let spawned = thread::Builder::new()
                .name("sampler".into())
                .spawn(move || Sampler::new(source, cell_s, period, shutdown_s).run());
            match spawned {
                Ok(handle) => handle,
                Err(e) => {
                    // Release the forwarder before bailing out
                    cell.close();
                    let _ = forwarder.join();
                    return Err(e);
                }
            }
        };

        info!(
            "[Pipeline] started: period={:?} log={}",
            config.period,
            config.log_path.display()
        );

        Ok(Self {
            cell,
            shutdown,
            sampler,
            forwarder,
        })
    }

    /// Stops both tasks and returns the final counters.
    pub fn shutdown(self) -> PipelineStats {
        info!("[Pipeline] shutting down...");
        self.shutdown.cancel();

        if self.sampler.join().is_err() {
            error!("[Pipeline] sampler thread panicked");
        }

        // Sampler is gone: anything still pending is forwarded, then the forwarder exits
        self.cell.close();
        let forwarder = match self.forwarder.join() {
            Ok(stats) => stats,
            Err(_) => {
                error!("[Pipeline] forwarder thread panicked");
                ForwarderStats::default()
            }
        };

        let stats = PipelineStats::new(self.cell.stats(), forwarder);
        if stats.cell.published != stats.cell.delivered + stats.cell.overwritten {
            warn!("[Pipeline] readings unaccounted for at shutdown: {:?}", stats.cell);
        }
        stats
    }
}
