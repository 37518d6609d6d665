//! The observer capability consumed by UI and diagnostics collaborators.

use crate::event::JobStateEvent;

/// Opaque handle returned by [`ObserverRegistry::subscribe`], used to
/// [`ObserverRegistry::unsubscribe`] later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Notified synchronously, on the notifier's thread, whenever a job's
/// status changes. Implementations must not block indefinitely — the
/// transition that triggered the event does not complete until every
/// observer has returned.
pub trait JobObserver: Send + Sync {
    /// Called once per successful transition, in the order transitions
    /// actually happened.
    fn on_job_state_changed(&self, event: &JobStateEvent);
}

impl<F> JobObserver for F
where
    F: Fn(&JobStateEvent) + Send + Sync,
{
    fn on_job_state_changed(&self, event: &JobStateEvent) {
        self(event);
    }
}
