//! Pipeline counters reported at shutdown.
//!
//! Two sources:
//! - **CellStats:** kept under the shared cell lock (published / overwritten / delivered).
//! - **ForwarderStats:** owned by the forwarder task (forwarded / logged / log failures).

use log::{info, warn};

use crate::component_a::shared_cell::CellStats;
use crate::component_b::forwarder::ForwarderStats;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub cell: CellStats,
    pub forwarder: ForwarderStats,
}

impl PipelineStats {
    pub fn new(cell: CellStats, forwarder: ForwarderStats) -> Self {
        Self { cell, forwarder }
    }

    /// Share of published readings that were replaced before being consumed, in %.
    pub fn overwrite_rate(&self) -> f64 {
        if self.cell.published == 0 {
            return 0.0;
        }
        self.cell.overwritten as f64 / self.cell.published as f64 * 100.0
    }

    pub fn log_summary(&self) {
        info!(
            "[Stats] published={} delivered={} overwritten={} ({:.2}%)",
            self.cell.published,
            self.cell.delivered,
            self.cell.overwritten,
            self.overwrite_rate()
        );
        info!(
            "[Stats] forwarded={} logged={} log_failures={}",
            self.forwarder.forwarded, self.forwarder.logged, self.forwarder.log_failures
        );
        if self.forwarder.log_failures > 0 {
            warn!(
                "[Stats] {} readings missing from the log",
                self.forwarder.log_failures
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_rate() {
        let stats = PipelineStats::new(
            CellStats {
                published: 8,
                overwritten: 2,
                delivered: 6,
            },
            ForwarderStats::default(),
        );
        assert_eq!(stats.overwrite_rate(), 25.0);
        assert_eq!(PipelineStats::default().overwrite_rate(), 0.0);
    }
}
