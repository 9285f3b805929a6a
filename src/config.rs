//! Runtime configuration for the telemetry pipeline.
//!
//! There are no command-line flags. Defaults reproduce the reference simulation
//! (1 s sampling, `sensor_data.csv` in the working directory, run until Ctrl-C);
//! a few environment variables override them for experiments and tests.

use std::{path::PathBuf, time::Duration};

use crate::error::ConfigError;

/// Sampling period of the sensor task
pub const DEFAULT_PERIOD_MS: u64 = 1_000;

/// Persistent log, truncated at startup
pub const DEFAULT_LOG_PATH: &str = "sensor_data.csv";

pub const ENV_PERIOD_MS: &str = "TELEMETRY_PERIOD_MS";
pub const ENV_LOG_PATH: &str = "TELEMETRY_LOG_PATH";
pub const ENV_RUN_SECS: &str = "TELEMETRY_RUN_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interval between two samples
    pub period: Duration,
    /// CSV log the forwarder appends to
    pub log_path: PathBuf,
    /// Stop after this long; `None` runs until interrupted
    pub run_for: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(DEFAULT_PERIOD_MS),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            run_for: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `TELEMETRY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PERIOD_MS) {
            let ms = parse_u64(ENV_PERIOD_MS, &raw)?;
            if ms == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_PERIOD_MS,
                    value: raw,
                    reason: "period must be at least 1 ms",
                });
            }
            config.period = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_LOG_PATH) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: ENV_LOG_PATH,
                    value: raw,
                    reason: "path is empty",
                });
            }
            config.log_path = PathBuf::from(trimmed);
        }

        if let Some(raw) = lookup(ENV_RUN_SECS) {
            let secs = parse_u64(ENV_RUN_SECS, &raw)?;
            // 0 keeps the default: run until interrupted
            config.run_for = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_u64(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected a non-negative integer",
        })
}
