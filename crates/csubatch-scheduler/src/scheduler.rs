//! The background reorderer.
//!
//! Keeps the pending sequence ordered under the active policy without
//! forcing the dispatcher to sort on every pop: submitters and the
//! dispatcher just flip `needs_sort` on `QueueManager`, and this loop
//! drains it on a fixed tick. `set_policy` additionally performs a
//! synchronous sort immediately so the very next pop already sees the new
//! ordering even if the tick hasn't fired yet.

use std::sync::Arc;
use std::time::Duration;

use csubatch_queue::{CancelToken, QueueManager, SCHEDULER_SORT_SOURCE};
use parking_lot::Mutex;
use tracing::debug;

use crate::policy::{self, Policy};

/// Default interval between background re-sort checks.
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// Periodically re-sorts the pending sequence to match the active policy.
pub struct Scheduler {
    queue: Arc<QueueManager>,
    policy: Mutex<Policy>,
}

impl Scheduler {
    /// Creates a scheduler over `queue`, starting with `initial_policy`.
    #[must_use]
    pub fn new(queue: Arc<QueueManager>, initial_policy: Policy) -> Self {
        Self {
            queue,
            policy: Mutex::new(initial_policy),
        }
    }

    /// The policy currently in effect.
    #[must_use]
    pub fn current_policy(&self) -> Policy {
        *self.policy.lock()
    }

    /// Switches the active policy. If it differs from the current one, the
    /// pending sequence is sorted under the new policy immediately and
    /// synchronously — the caller's next pop is guaranteed to observe the
    /// new order without waiting for the background tick.
    pub fn set_policy(&self, new_policy: Policy) {
        let mut current = self.policy.lock();
        if *current == new_policy {
            return;
        }
        *current = new_policy;
        drop(current);
        self.sort_once(new_policy);
    }

    /// Runs the background tick loop until `cancel` is triggered.
    pub async fn run(&self, tick: Duration, cancel: &CancelToken) {
        loop {
            cancel.sleep_or_cancelled(tick).await;
            if cancel.is_cancelled() {
                break;
            }
            if self.queue.is_needing_sort() {
                let policy = self.current_policy();
                self.sort_once(policy);
            }
        }
    }

    /// Snapshots the pending sequence, stable-sorts it under `policy`,
    /// atomically replaces it, and clears `needs_sort`.
    fn sort_once(&self, policy: Policy) {
        let mut seq = self.queue.snapshot();
        seq.sort_by(|a, b| policy::compare(policy, a, b));
        debug!(jobs = seq.len(), ?policy, "resorting pending queue");
        self.queue.replace_all(seq, SCHEDULER_SORT_SOURCE);
        self.queue.set_needs_sort(false);
    }
}
