//! output.rs
//! Output sinks for rendered readings: the simulated UART link.
//! - `UartConsole`: writes each record to a byte stream (stdout in the binary)
//! - crossbeam `Sender<String>`: hands records to another thread
//!
//! Sinks take no acknowledgement and apply no backpressure; a failed write is
//! reported and the record is dropped.

use std::io::{self, Stdout, Write};

use crossbeam::channel::Sender;
use log::warn;

/// Receives one rendered text record per reading.
pub trait OutputSink: Send {
    fn emit(&mut self, record: &str);
}

/// Serial link stand-in backed by any writer.
pub struct UartConsole<W: Write + Send> {
    out: W,
}

impl UartConsole<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> UartConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> OutputSink for UartConsole<W> {
    fn emit(&mut self, record: &str) {
        let written = writeln!(self.out, "{record}").and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!("[UART] console write failed: {}", e);
        }
    }
}

impl OutputSink for Sender<String> {
    fn emit(&mut self, record: &str) {
        if self.send(record.to_string()).is_err() {
            warn!("[UART] receiver gone, record dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    #[test]
    fn test_console_appends_newline_per_record() {
        let mut console = UartConsole::new(Vec::new());
        console.emit("first");
        console.emit("second\nline");

        let bytes = console.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "first\nsecond\nline\n");
    }

    #[test]
    fn test_channel_sink_forwards_records() {
        let (mut tx, rx) = unbounded::<String>();
        tx.emit("hello");
        assert_eq!(rx.try_recv().unwrap(), "hello");

        drop(rx);
        // Must not panic with the receiver gone
        tx.emit("lost");
    }
}
