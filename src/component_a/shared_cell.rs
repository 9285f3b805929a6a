//! shared_cell.rs
//! Single-slot hand-off between the sampler (producer) and the forwarder (consumer).
//!
//! LATEST VALUE WINS
//! - The cell holds at most one reading. It is NOT a queue.
//! - `publish` overwrites a reading the forwarder has not taken yet. The overwritten
//!   reading is lost without notice to either side: the pipeline reports the
//!   current temperature, not a history.
//!
//! SYNCHRONISATION
//! - One mutex guards the reading and the pending state together, so the flag is
//!   never observed apart from its value.
//! - One condition variable signals readiness. Waiters loop on the pending
//!   predicate, so spurious wakeups never hand out stale data.
//! - `close` is the shutdown transition: it wakes a blocked consumer, which gets
//!   any still-pending reading first and `None` afterwards.

use std::time::{Duration, Instant};

use log::debug;
use parking_lot::{Condvar, Mutex};

use crate::component_a::sensor::Reading;

/// Counters kept under the cell lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellStats {
    /// Readings accepted by `publish`
    pub published: u64,
    /// Readings replaced before the consumer took them
    pub overwritten: u64,
    /// Readings handed to the consumer
    pub delivered: u64,
}

/// Guarded state. `pending` is `reading.is_some()`: the two cannot disagree.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    reading: Option<Reading>,
    closed: bool,
    stats: CellStats,
}

impl Slot {
    /// Stores `reading`, returning the unconsumed one it replaced.
    /// A closed slot rejects the write and returns `None`.
    pub(crate) fn store(&mut self, reading: Reading) -> Option<Reading> {
        if self.closed {
            return None;
        }
        let stale = self.reading.replace(reading);
        self.stats.published += 1;
        if stale.is_some() {
            self.stats.overwritten += 1;
        }
        stale
    }

    pub(crate) fn take_pending(&mut self) -> Option<Reading> {
        let reading = self.reading.take();
        if reading.is_some() {
            self.stats.delivered += 1;
        }
        reading
    }

    pub(crate) fn pending(&self) -> bool {
        self.reading.is_some()
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn stats(&self) -> CellStats {
        self.stats
    }
}

/// Monitor connecting exactly one producer and one consumer.
#[derive(Debug, Default)]
pub struct SharedCell {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl SharedCell {
    /// Empty cell, nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `reading`, replacing any unconsumed one, and wakes the consumer.
    /// Never waits on the consumer. Ignored once the cell is closed.
    pub fn publish(&self, reading: Reading) {
        let mut slot = self.slot.lock();
        if slot.is_closed() {
            debug!("[SharedCell] publish after close ignored");
            return;
        }
        if let Some(stale) = slot.store(reading) {
            debug!(
                "[SharedCell] overwrote unconsumed reading ts={} temp={:.2}",
                stale.timestamp(),
                stale.temperature()
            );
        }
        self.ready.notify_one();
    }

    /// Blocks until a reading is pending, then takes it and clears pending.
    ///
    /// Returns `None` only once the cell is closed and nothing is pending.
    pub fn take_blocking(&self) -> Option<Reading> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(reading) = slot.take_pending() {
                return Some(reading);
            }
            if slot.is_closed() {
                return None;
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Like [`SharedCell::take_blocking`] but gives up after `timeout`.
    /// A timeout past the clock's range waits without a deadline.
    pub fn take_timeout(&self, timeout: Duration) -> Option<Reading> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.take_blocking(),
        };
        let mut slot = self.slot.lock();
        loop {
            if let Some(reading) = slot.take_pending() {
                return Some(reading);
            }
            if slot.is_closed() {
                return None;
            }
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                return slot.take_pending();
            }
        }
    }

    /// Rejects further publishes and wakes a blocked consumer.
    pub fn close(&self) {
        let mut slot = self.slot.lock();
        slot.close();
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().is_closed()
    }

    /// True when a reading is waiting for the consumer.
    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending()
    }

    pub fn stats(&self) -> CellStats {
        self.slot.lock().stats()
    }
}
