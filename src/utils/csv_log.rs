//! Append-only CSV log of forwarded readings.
//!
//! One line per reading, no header: `YYYY-MM-DD HH:MM:SS,<temperature .2>`.
//! Every append opens the file in append mode, writes one record, syncs and
//! closes it again, so a record is on disk before the forwarder moves on.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use csv::WriterBuilder;
use serde::{Serialize, Serializer};

use crate::error::LogError;

#[derive(Debug, Serialize)]
struct LogRow<'a> {
    timestamp: &'a str,
    #[serde(serialize_with = "two_decimals")]
    temperature: f64,
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates (or creates) the log. Run once before the tasks start.
    pub fn reset(&self) -> Result<(), LogError> {
        File::create(&self.path)
            .map(|_| ())
            .map_err(|source| LogError::Open {
                path: self.path.clone(),
                source,
            })
    }

    /// Appends one `timestamp,temperature` record and syncs it to disk.
    pub fn append(&self, timestamp: &str, temperature: f64) -> Result<(), LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.serialize(LogRow {
            timestamp,
            temperature,
        })
        .map_err(|source| LogError::Csv {
            path: self.path.clone(),
            source,
        })?;

        let file = wtr.into_inner().map_err(|e| LogError::Write {
            path: self.path.clone(),
            source: e.into_error(),
        })?;
        file.sync_data().map_err(|source| LogError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
