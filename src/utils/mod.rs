pub mod csv_log;
pub mod metrics;
pub mod shutdown;
