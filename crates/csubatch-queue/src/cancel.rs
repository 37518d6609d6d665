//! Cooperative cancellation used by blocking waits like
//! [`crate::manager::QueueManager::retrieve`] and the dispatcher's main
//! loop.
//!
//! `stop()` is cheap to call from any thread; waiters wake up at their next
//! suspension point rather than being torn down mid-step, which is what
//! lets an in-flight job reach `INTERRUPTED` before the loop actually
//! exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A cooperative cancellation flag with a wakeup signal.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    /// Marks the token cancelled and wakes any current/future waiters.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Returns `true` once [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` or returns early if cancelled in the meantime.
    pub async fn sleep_or_cancelled(&self, duration: std::time::Duration) {
        if self.is_cancelled() {
            return;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => {}
            () = self.notify.notified() => {}
        }
    }
}
