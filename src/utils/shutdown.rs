//! Cancellation token shared by the pipeline tasks.
//!
//! Cancelling drops the only sender of a zero-capacity channel, so every task
//! parked in [`Shutdown::sleep_until`] wakes immediately with a disconnect rather
//! than waiting out its period. The atomic flag answers cheap polls between
//! blocking operations.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, bounded};
use parking_lot::Mutex;

struct Inner {
    cancelled: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (trigger, signal) = bounded::<()>(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.trigger.lock().take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Sleeps until `deadline`; returns `true` if cancelled meanwhile.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.inner.signal.recv_deadline(deadline) {
            Err(RecvTimeoutError::Timeout) => self.is_cancelled(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    pub fn sleep(&self, duration: Duration) -> bool {
        match Instant::now().checked_add(duration) {
            Some(deadline) => self.sleep_until(deadline),
            // Nothing is ever sent; recv only returns once cancel drops the sender
            None => {
                let _ = self.inner.signal.recv();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sleep_times_out_when_not_cancelled() {
        let shutdown = Shutdown::new();
        let started = Instant::now();
        assert!(!shutdown.sleep(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(!shutdown.is_cancelled());
    }

    #[test]
    fn test_cancel_wakes_sleeper_early() {
        let shutdown = Shutdown::new();
        let sleeper = {
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                let started = Instant::now();
                let cancelled = shutdown.sleep(Duration::from_secs(30));
                (cancelled, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        shutdown.cancel();

        let (cancelled, waited) = sleeper.join().unwrap();
        assert!(cancelled);
        assert!(waited < Duration::from_secs(5));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let shutdown = Shutdown::new();
        shutdown.cancel();
        shutdown.cancel();
        assert!(shutdown.is_cancelled());
        assert!(shutdown.sleep(Duration::from_secs(30)));
    }

    #[test]
    fn test_unbounded_sleep_ends_on_cancel() {
        let shutdown = Shutdown::new();
        let sleeper = {
            let shutdown = shutdown.clone();
            thread::spawn(move || shutdown.sleep(Duration::MAX))
        };

        thread::sleep(Duration::from_millis(20));
        shutdown.cancel();
        assert!(sleeper.join().unwrap());
    }
}
