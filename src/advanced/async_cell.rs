//! Cooperative counterpart of `SharedCell` for tokio tasks.
//!
//! Same contract: one slot, latest value wins, one consumer. The slot is guarded
//! by a short `parking_lot` critical section that never spans an `.await`;
//! readiness is a `tokio::sync::Notify`, whose stored permit covers a publish
//! that lands between the consumer's check and its wait.

use log::debug;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::component_a::{
    sensor::Reading,
    shared_cell::{CellStats, Slot},
};

#[derive(Debug, Default)]
pub struct AsyncSharedCell {
    slot: Mutex<Slot>,
    ready: Notify,
}

impl AsyncSharedCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any unconsumed reading and wakes the consumer.
    pub fn publish(&self, reading: Reading) {
        {
            let mut slot = self.slot.lock();
            if slot.is_closed() {
                debug!("[AsyncSharedCell] publish after close ignored");
                return;
            }
            if slot.store(reading).is_some() {
                debug!("[AsyncSharedCell] overwrote unconsumed reading");
            }
        }
        self.ready.notify_one();
    }

    /// Waits for a pending reading; `None` once closed and empty.
    pub async fn take(&self) -> Option<Reading> {
        loop {
            {
                let mut slot = self.slot.lock();
                if let Some(reading) = slot.take_pending() {
                    return Some(reading);
                }
                if slot.is_closed() {
                    return None;
                }
            }
            // A leftover permit only causes one extra pass through the check above
            self.ready.notified().await;
        }
    }

    pub fn close(&self) {
        self.slot.lock().close();
        self.ready.notify_one();
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending()
    }

    pub fn stats(&self) -> CellStats {
        self.slot.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};
    use tokio::time::timeout;

    fn reading(t: f64) -> Reading {
        Reading::new(t, 1_700_000_000)
    }

    #[tokio::test]
    async fn test_latest_publish_wins() {
        let cell = AsyncSharedCell::new();
        cell.publish(reading(1.0));
        cell.publish(reading(2.0));

        assert_eq!(cell.take().await, Some(reading(2.0)));
        assert!(!cell.is_pending());
        assert_eq!(cell.stats().overwritten, 1);
    }

    #[tokio::test]
    async fn test_take_waits_for_publish() {
        let cell = Arc::new(AsyncSharedCell::new());
        let consumer = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        cell.publish(reading(7.0));
        let got = timeout(Duration::from_secs(5), consumer).await.unwrap().unwrap();
        assert_eq!(got, Some(reading(7.0)));
    }

    #[tokio::test]
    async fn test_no_duplicate_delivery() {
        let cell = AsyncSharedCell::new();
        cell.publish(reading(3.0));
        assert_eq!(cell.take().await, Some(reading(3.0)));

        // The publish left a permit behind; the second take must still wait
        assert!(timeout(Duration::from_millis(50), cell.take()).await.is_err());
    }

    #[tokio::test]
    async fn test_close_releases_consumer() {
        let cell = Arc::new(AsyncSharedCell::new());
        let consumer = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.take().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cell.close();
        let got = timeout(Duration::from_secs(5), consumer).await.unwrap().unwrap();
        assert_eq!(got, None);
    }
}
