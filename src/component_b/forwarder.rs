//! forwarder.rs
//! Consumer task: takes readings from the shared cell, sends them over the
//! simulated UART and appends them to the CSV log.
//! - Suspends only while waiting on the cell (plus its own output/log I/O)
//! - Log failures are reported and skipped; the reading was already emitted
//! - Exits when the cell is closed and drained

use chrono::{Local, TimeZone};
use log::{debug, error, info};
use std::fmt::Display;

use crate::component_a::{sensor::Reading, shared_cell::SharedCell};
use crate::component_b::output::OutputSink;
use crate::utils::csv_log::CsvLog;

/// strftime pattern used on the link and in the log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ForwarderStats {
    /// Readings emitted to the output sink
    pub forwarded: u64,
    /// Readings appended to the log
    pub logged: u64,
    /// Log appends that failed
    pub log_failures: u64,
}

/// Renders epoch seconds in `tz` as `YYYY-MM-DD HH:MM:SS`.
/// Falls back to the raw number for instants `tz` cannot represent.
pub fn format_timestamp<Tz>(secs: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    i64::try_from(secs)
        .ok()
        .and_then(|s| tz.timestamp_opt(s, 0).earliest())
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Local-time rendering used by the forwarder.
pub fn format_local(secs: u64) -> String {
    format_timestamp(secs, &Local)
}

/// Text record sent over the link for one reading.
pub fn render_record(timestamp: &str, temperature: f64) -> String {
    format!(
        "[Forwarder] data sent over UART\nTimestamp: {timestamp}\nTemperature: {temperature:.2} °C"
    )
}

pub struct Forwarder<O: OutputSink> {
    sink: O,
    log: CsvLog,
    stats: ForwarderStats,
}

impl<O: OutputSink> Forwarder<O> {
    pub fn new(sink: O, log: CsvLog) -> Self {
        Self {
            sink,
            log,
            stats: ForwarderStats::default(),
        }
    }

    /// Consumes readings until `cell` is closed and empty.
    pub fn run(mut self, cell: &SharedCell) -> ForwarderStats {
        info!("[Forwarder] task started, log={}", self.log.path().display());

        while self.step(cell) {}

        info!(
            "[Forwarder] stopped: forwarded={} logged={} log_failures={}",
            self.stats.forwarded, self.stats.logged, self.stats.log_failures
        );
        self.stats
    }

    /// One iteration: wait, take, forward. `false` once the cell is closed.
    pub fn step(&mut self, cell: &SharedCell) -> bool {
        match cell.take_blocking() {
            Some(reading) => {
                self.forward(reading);
                true
            }
            None => false,
        }
    }

    /// Emits `reading` and appends it to the log.
    pub fn forward(&mut self, reading: Reading) {
        let timestamp = format_local(reading.timestamp());

        self.sink.emit(&render_record(&timestamp, reading.temperature()));
        self.stats.forwarded += 1;

        match self.log.append(&timestamp, reading.temperature()) {
            Ok(()) => {
                self.stats.logged += 1;
                debug!("[Forwarder] logged {} {:.2}", timestamp, reading.temperature());
            }
            Err(e) => {
                self.stats.log_failures += 1;
                error!("[Forwarder] failed to append reading to log: {}", e);
            }
        }
    }

    pub fn stats(&self) -> ForwarderStats {
        self.stats
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }
}
