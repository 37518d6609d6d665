//! Concurrent observer registration and synchronous, panic-isolated
//! delivery.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use csubatch_core::{EventSink, Level};
use parking_lot::RwLock;

use crate::event::JobStateEvent;
use crate::observer::{JobObserver, ObserverId};

/// Registry of subscribed [`JobObserver`]s.
///
/// Registration is a concurrent list guarded by a lock; `publish` takes a
/// snapshot of the current subscribers before notifying so that an
/// observer subscribing or unsubscribing mid-notification never affects
/// the event already in flight.
pub struct ObserverRegistry {
    next_id: AtomicU64,
    observers: RwLock<Vec<(ObserverId, Arc<dyn JobObserver>)>>,
}

impl ObserverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Registers an observer, returning a handle for later unsubscription.
    pub fn subscribe(&self, observer: Arc<dyn JobObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        id
    }

    /// Removes a previously registered observer. A no-op if `id` is
    /// unknown (e.g. already unsubscribed).
    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.write().retain(|(oid, _)| *oid != id);
    }

    /// Returns the number of currently registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns `true` if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every observer registered at the moment of the
    /// call. An observer that panics is caught and reported to `sink` at
    /// [`Level::Warn`]; the remaining observers still receive the event and
    /// the transition that produced it is never rolled back.
    pub fn publish(&self, event: &JobStateEvent, sink: &dyn EventSink) {
        let snapshot: Vec<_> = self.observers.read().clone();
        for (_, observer) in snapshot {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_job_state_changed(event);
            }));
            if let Err(payload) = result {
                let reason = panic_message(&payload);
                sink.log(
                    Level::Warn,
                    &format!(
                        "observer panicked handling job '{}' transition {} -> {}: {reason}",
                        event.job.name(),
                        event.old_status,
                        event.new_status
                    ),
                );
            }
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
