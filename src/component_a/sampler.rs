//! sampler.rs
//! Producer task: periodic release of temperature readings into the shared cell.
//! - Fixed-rate schedule (`next_deadline += period`), resynchronised after an overrun
//! - Suspends only in its period sleep, which the shutdown token interrupts
//! - No retries: the reading source is expected to answer every call

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::component_a::{
    sensor::{Reading, ReadingSource},
    shared_cell::SharedCell,
};
use crate::utils::shutdown::Shutdown;

pub struct Sampler<S: ReadingSource> {
    source: S,
    cell: Arc<SharedCell>,
    period: Duration,
    shutdown: Shutdown,
}

impl<S: ReadingSource> Sampler<S> {
    pub fn new(source: S, cell: Arc<SharedCell>, period: Duration, shutdown: Shutdown) -> Self {
        Self {
            source,
            cell,
            period,
            shutdown,
        }
    }

    /// Main sampler loop; returns once the shutdown token fires.
    pub fn run(&mut self) {
        info!("[Sampler] task started, period={:?}", self.period);

        let mut next_deadline = Instant::now();
        let mut samples: u64 = 0;

        while !self.shutdown.is_cancelled() {
            if self.sample_once().is_some() {
                samples += 1;
            }

            next_deadline += self.period;
            let now = Instant::now();
            if now >= next_deadline {
                // Overran the period: start a fresh schedule instead of bursting
                debug!(
                    "[Sampler] period overrun by {:?}",
                    now.duration_since(next_deadline)
                );
                next_deadline = now;
            }

            if self.shutdown.sleep_until(next_deadline) {
                break;
            }
        }

        info!("[Sampler] stopped after {} samples", samples);
    }

    /// Reads the source once and publishes the result.
    ///
    /// Non-finite values break the source contract and are dropped.
    pub fn sample_once(&mut self) -> Option<Reading> {
        let temperature = self.source.read_temperature();
        if !temperature.is_finite() {
            warn!("[Sampler] source returned {temperature}, sample dropped");
            return None;
        }

        let reading = Reading::now(temperature);
        self.cell.publish(reading);
        debug!(
            "[Sampler] published ts={} temp={:.2}",
            reading.timestamp(),
            reading.temperature()
        );
        Some(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_a::sensor::ScriptedAdc;
    use std::thread;

    #[test]
    fn test_sample_once_publishes() {
        let cell = Arc::new(SharedCell::new());
        let mut sampler = Sampler::new(
            ScriptedAdc::new([500]),
            cell.clone(),
            Duration::from_secs(1),
            Shutdown::new(),
        );

        let published = sampler.sample_once().unwrap();
        assert_eq!(published.temperature(), 25.0);
        assert_eq!(cell.take_timeout(Duration::from_millis(10)), Some(published));
    }

    #[test]
    fn test_non_finite_reading_not_published() {
        let cell = Arc::new(SharedCell::new());
        let mut sampler = Sampler::new(
            || f64::NAN,
            cell.clone(),
            Duration::from_secs(1),
            Shutdown::new(),
        );

        assert!(sampler.sample_once().is_none());
        assert!(!cell.is_pending());
    }

    #[test]
    fn test_run_stops_on_cancel() {
        let cell = Arc::new(SharedCell::new());
        let shutdown = Shutdown::new();
        let handle = {
            let cell = cell.clone();
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                Sampler::new(ScriptedAdc::new([200]), cell, Duration::from_secs(60), shutdown)
                    .run();
            })
        };

        // First sample is released immediately, then the sampler parks for a minute
        assert!(cell.take_timeout(Duration::from_secs(5)).is_some());
        shutdown.cancel();
        handle.join().unwrap();
        assert_eq!(cell.stats().published, 1);
    }

    #[test]
    fn test_already_cancelled_sampler_publishes_nothing() {
        let cell = Arc::new(SharedCell::new());
        let shutdown = Shutdown::new();
        shutdown.cancel();

        Sampler::new(ScriptedAdc::new([200]), cell.clone(), Duration::from_millis(1), shutdown)
            .run();
        assert_eq!(cell.stats().published, 0);
    }
}
