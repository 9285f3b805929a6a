// Component B: link side of the pipeline.
// Forwarder task plus the output sinks standing in for the UART.

pub mod forwarder;
pub mod output;
