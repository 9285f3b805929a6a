//! Error types for the telemetry pipeline.

use std::{fmt, io, path::PathBuf};

/// Error returned when the persistent log cannot be reset or appended to.
#[derive(Debug)]
pub enum LogError {
    /// The log file could not be opened (or created / truncated)
    Open { path: PathBuf, source: io::Error },
    /// The record was serialised but could not be written or synced
    Write { path: PathBuf, source: io::Error },
    /// The record could not be serialised as CSV
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open log file {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write log file {}: {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "cannot encode record for {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

/// Error returned when an environment override cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { var, value, reason } => {
                write!(f, "invalid value {value:?} for {var}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
