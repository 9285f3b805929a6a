//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::{fs, path::PathBuf};

/// Unique log path in the system temp dir; removed on drop.
pub struct TempLog {
    pub path: PathBuf,
}

impl TempLog {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "temp_telemetry_it_{}_{}.csv",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Self { path }
    }

    pub fn lines(&self) -> Vec<String> {
        fs::read_to_string(&self.path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for TempLog {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Path whose parent directory does not exist, so every open fails.
pub fn unwritable_log_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("temp_telemetry_absent_{}", std::process::id()))
        .join("sensor_data.csv")
}

/// Temperature column of a `timestamp,temperature` log line.
pub fn temperature_field(line: &str) -> &str {
    line.rsplit(',').next().unwrap_or("")
}

/// Timestamp column of a `timestamp,temperature` log line.
pub fn timestamp_field(line: &str) -> &str {
    line.split(',').next().unwrap_or("")
}
