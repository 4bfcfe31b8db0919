//! Pending-event guard: bookkeeping for sent-but-unanswered requests.
//!
//! # What problem does this solve? (for beginners)
//!
//! Every key event sent to the consumer waits for a reply.  A consumer that is
//! stuck or very slow never answers, and the unanswered requests pile up.  The
//! guard counts them and logs a warning when the count crosses a ceiling, so
//! an operator can spot the stalled consumer.
//!
//! The guard is a health signal, not flow control: it never blocks, throttles,
//! or drops a send.
//!
//! # RAII tickets
//!
//! [`PendingEventGuard::track`] returns a [`PendingTicket`].  The ticket is
//! held by the task waiting for the reply and releases its slot when dropped,
//! so a request is counted exactly as long as something is waiting for it.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::warn;

/// Default ceiling on unanswered requests before a warning is emitted.
pub const DEFAULT_MAX_PENDING_EVENTS: usize = 1000;

/// Counts in-flight requests and warns when a ceiling is exceeded.
#[derive(Debug)]
pub struct PendingEventGuard {
    pending: AtomicUsize,
    ceiling: usize,
    overflow_warnings: AtomicU64,
    idle: Notify,
}

impl PendingEventGuard {
    /// Creates a guard that warns once the pending count exceeds `ceiling`.
    pub fn new(ceiling: usize) -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicUsize::new(0),
            ceiling,
            overflow_warnings: AtomicU64::new(0),
            idle: Notify::new(),
        })
    }

    /// Registers one dispatched request.
    ///
    /// Emits a warning when this request takes the count from `ceiling` to
    /// `ceiling + 1`.  Further requests above the ceiling stay silent until
    /// the count has dropped back and crosses again.
    pub fn track(self: &Arc<Self>) -> PendingTicket {
        let previous = self.pending.fetch_add(1, Ordering::SeqCst);
        if previous == self.ceiling {
            self.overflow_warnings.fetch_add(1, Ordering::Relaxed);
            warn!(
                pending = previous + 1,
                ceiling = self.ceiling,
                "there are more than {} pending key events; the consumer may be unresponsive",
                self.ceiling
            );
        }
        PendingTicket {
            guard: Arc::clone(self),
        }
    }

    /// Number of requests currently awaiting a reply.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// The configured ceiling.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// How many times the ceiling has been crossed.
    pub fn overflow_warnings(&self) -> u64 {
        self.overflow_warnings.load(Ordering::Relaxed)
    }

    /// Resolves once no request is awaiting a reply.
    pub async fn drained(&self) {
        loop {
            let idle = self.idle.notified();
            tokio::pin!(idle);
            // Register before checking so a release in between is not missed.
            idle.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            idle.await;
        }
    }

    fn release(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// One tracked in-flight request.  Dropping it releases the slot.
#[derive(Debug)]
#[must_use = "dropping the ticket immediately releases the pending slot"]
pub struct PendingTicket {
    guard: Arc<PendingEventGuard>,
}

impl Drop for PendingTicket {
    fn drop(&mut self) {
        self.guard.release();
    }
}
