//! sensor.rs
//! Temperature reading sources for the sampler task.
//! - `Reading`: one immutable (timestamp, temperature) sample
//! - `ReadingSource`: the pluggable collaborator the sampler calls each period
//! - `SimulatedAdc` / `ScriptedAdc`: NTC thermistor behind a 10-bit ADC, simulated
//!
//! The simulated front end only ever reports ADC counts in [200, 800], mapped
//! linearly onto 0..50 °C. Any other source (real driver, closure) can be plugged
//! in as long as it returns a finite value.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Lowest ADC count the simulated thermistor produces (0 °C)
pub const ADC_MIN: u16 = 200;
/// Highest ADC count the simulated thermistor produces (50 °C)
pub const ADC_MAX: u16 = 800;
/// Temperature covered by the ADC window
pub const TEMP_SPAN_C: f64 = 50.0;

/// One sample: temperature in °C and the wall-clock second it was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    temperature: f64,
    timestamp: u64,
}

impl Reading {
    pub fn new(temperature: f64, timestamp: u64) -> Self {
        Self {
            temperature,
            timestamp,
        }
    }

    /// Tags `temperature` with the current wall-clock time.
    pub fn now(temperature: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::new(temperature, timestamp)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Anything the sampler can ask for a temperature.
pub trait ReadingSource: Send {
    fn read_temperature(&mut self) -> f64;
}

impl<F> ReadingSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn read_temperature(&mut self) -> f64 {
        self()
    }
}

/// Linear ADC → °C mapping: 200 counts is 0 °C, 800 counts is 50 °C.
///
/// Written as `span * (adc - min) / (max - min)` so both endpoints (and the
/// midpoint) come out exact in floating point.
pub fn adc_to_celsius(adc: u16) -> f64 {
    TEMP_SPAN_C * (f64::from(adc) - f64::from(ADC_MIN)) / f64::from(ADC_MAX - ADC_MIN)
}

/// Uniformly random ADC counts in `[ADC_MIN, ADC_MAX]`.
pub struct SimulatedAdc {
    rng: StdRng,
}

impl SimulatedAdc {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for experiments.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn read_adc(&mut self) -> u16 {
        self.rng.random_range(ADC_MIN..=ADC_MAX)
    }
}

impl ReadingSource for SimulatedAdc {
    fn read_temperature(&mut self) -> f64 {
        adc_to_celsius(self.read_adc())
    }
}

/// Replays a fixed list of ADC counts, wrapping around at the end.
/// An empty script reads as `ADC_MIN`.
#[derive(Debug, Clone)]
pub struct ScriptedAdc {
    counts: Vec<u16>,
    cursor: usize,
}

impl ScriptedAdc {
    pub fn new(counts: impl Into<Vec<u16>>) -> Self {
        Self {
            counts: counts.into(),
            cursor: 0,
        }
    }

    pub fn read_adc(&mut self) -> u16 {
        if self.counts.is_empty() {
            return ADC_MIN;
        }
        let adc = self.counts[self.cursor];
        self.cursor = (self.cursor + 1) % self.counts.len();
        adc
    }
}

impl ReadingSource for ScriptedAdc {
    fn read_temperature(&mut self) -> f64 {
        adc_to_celsius(self.read_adc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_endpoints_are_exact() {
        assert_eq!(adc_to_celsius(ADC_MIN), 0.0);
        assert_eq!(adc_to_celsius(ADC_MAX), 50.0);
        assert_eq!(adc_to_celsius(500), 25.0);
    }

    #[test]
    fn test_adc_mapping_is_linear() {
        // 12 counts per degree
        assert!((adc_to_celsius(212) - 1.0).abs() < 1e-12);
        assert!((adc_to_celsius(440) - 20.0).abs() < 1e-12);
        assert!(adc_to_celsius(ADC_MIN) < adc_to_celsius(ADC_MIN + 1));
    }

    #[test]
    fn test_scripted_adc_cycles() {
        let mut adc = ScriptedAdc::new([200, 500, 800]);
        let temps: Vec<f64> = (0..5).map(|_| adc.read_temperature()).collect();
        assert_eq!(temps, vec![0.0, 25.0, 50.0, 0.0, 25.0]);
    }

    #[test]
    fn test_empty_script_reads_minimum() {
        let mut adc = ScriptedAdc::new(Vec::new());
        assert_eq!(adc.read_adc(), ADC_MIN);
        assert_eq!(adc.read_temperature(), 0.0);
    }

    #[test]
    fn test_simulated_adc_stays_in_window() {
        let mut adc = SimulatedAdc::with_seed(7);
        for _ in 0..1_000 {
            let t = adc.read_temperature();
            assert!(t.is_finite());
            assert!((0.0..=TEMP_SPAN_C).contains(&t), "out of range: {t}");
        }
    }

    #[test]
    fn test_seeded_adc_is_reproducible() {
        let mut a = SimulatedAdc::with_seed(42);
        let mut b = SimulatedAdc::with_seed(42);
        for _ in 0..32 {
            assert_eq!(a.read_adc(), b.read_adc());
        }
    }

    #[test]
    fn test_closure_source() {
        let mut next = 10.0;
        let mut source = move || {
            next += 0.5;
            next
        };
        assert_eq!(source.read_temperature(), 10.5);
        assert_eq!(source.read_temperature(), 11.0);
    }

    #[test]
    fn test_reading_now_uses_wall_clock() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let r = Reading::now(21.5);
        assert_eq!(r.temperature(), 21.5);
        assert!(r.timestamp() >= before);
    }
}
