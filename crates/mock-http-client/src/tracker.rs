//! In-flight dispatch accounting.
//!
//! A dispatch increments the counter when it begins and holds a
//! [`PendingGuard`]. The guard is released only after the outcome has been
//! delivered and the settle task has yielded once, so continuations woken
//! by the delivery get to run (and possibly start new dispatches) before the
//! count can drop.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::error;

/// Per-client count of in-flight dispatches.
#[derive(Debug, Default)]
pub struct PendingRequestTracker {
    in_flight: AtomicUsize,
    /// Bumped on every increment; lets the waiter detect activity that
    /// started and finished between two observations of zero.
    generation: AtomicU64,
    idle: Notify,
}

impl PendingRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn increment(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the count. A decrement at zero is logged and ignored.
    pub fn decrement(&self) {
        match self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(1) => self.idle.notify_waiters(),
            Ok(_) => {}
            Err(_) => error!("Pending request counter decremented at zero, ignoring"),
        }
    }

    /// Increment and return a guard that decrements on drop.
    pub fn begin(self: &Arc<Self>) -> PendingGuard {
        self.increment();
        PendingGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Resolve once no dispatch is in flight and none was started while
    /// yielding to the scheduler.
    ///
    /// A single check is not enough: settling one request may start another
    /// from a continuation on the same tick. The loop parks while the count
    /// is non-zero, then requires two observations of zero around a yield
    /// with no increment in between.
    pub async fn wait_for_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight() > 0 {
                notified.await;
                continue;
            }

            let generation = self.generation.load(Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.in_flight() == 0 && self.generation.load(Ordering::SeqCst) == generation {
                return;
            }
        }
    }
}

/// Holds one unit of the pending count for a dispatch.
#[derive(Debug)]
pub struct PendingGuard {
    tracker: Arc<PendingRequestTracker>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.tracker.decrement();
    }
}
