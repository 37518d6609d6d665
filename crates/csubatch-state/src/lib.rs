//! # CSUbatch State
//!
//! `JobStateManager`: the single authority for `Job` status transitions.
//! Every status change in the engine — selection, start, completion,
//! rescheduling, cancellation — goes through
//! [`JobStateManager::update_status`], which validates the transition
//! against the table in the engine specification, writes the new status,
//! and publishes a [`JobStateEvent`] to registered observers.

#![warn(missing_docs)]
#![warn(unused)]

use std::sync::Arc;

use csubatch_core::{EngineError, EngineResult, EventSink, Job, JobContext, JobStatus, Level};
use csubatch_events::{JobObserver, JobStateEvent, ObserverRegistry};

pub use csubatch_events::ObserverId;

/// Validates status transitions and notifies observers of the ones that
/// succeed.
pub struct JobStateManager {
    sink: Arc<dyn EventSink>,
    observers: ObserverRegistry,
}

impl JobStateManager {
    /// Creates a manager that reports rejected transitions and observer
    /// failures to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            observers: ObserverRegistry::new(),
        }
    }

    /// Attempts to move `job` from its current status to `new_status`.
    ///
    /// On success, writes the new status and publishes a [`JobStateEvent`]
    /// synchronously to every registered observer, then returns `Ok(())`.
    ///
    /// On rejection (the transition isn't in the table below), the job's
    /// status is left unchanged, a warn-level event is reported to the
    /// sink, no observer is notified, and
    /// `Err(EngineError::InvalidTransition)` is returned.
    pub fn update_status(
        &self,
        job: &Arc<Job>,
        new_status: JobStatus,
        source: &str,
        message: &str,
    ) -> EngineResult<()> {
        let old_status = job.status();
        if !is_allowed(old_status, new_status) {
            self.sink.log_job(
                Level::Warn,
                &JobContext::from_job(job),
                &format!("rejected transition {old_status} -> {new_status} from {source}"),
            );
            return Err(EngineError::InvalidTransition {
                from: old_status,
                to: new_status,
            });
        }

        job.set_status_unchecked(new_status);
        let event = JobStateEvent::new(job.clone(), old_status, new_status, source, message);
        self.observers.publish(&event, self.sink.as_ref());
        Ok(())
    }

    /// Registers an observer; returns a handle for [`Self::unsubscribe`].
    pub fn subscribe(&self, observer: Arc<dyn JobObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// Removes a previously registered observer.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.unsubscribe(id);
    }
}

/// The transition table from the engine specification:
///
/// | From \ To | SELECTED | RUNNING | WAITING | COMPLETED | INTERRUPTED | CANCELED |
/// |---|---|---|---|---|---|---|
/// | WAITING | Y | | | | | Y |
/// | SELECTED | | Y | Y | | | Y |
/// | RUNNING | | | Y | Y | Y | Y |
/// | terminal | | | | | | |
#[must_use]
pub fn is_allowed(from: JobStatus, to: JobStatus) -> bool {
    use JobStatus::{Canceled, Completed, Interrupted, Running, Selected, Waiting};

    matches!(
        (from, to),
        (Waiting, Selected)
            | (Waiting, Canceled)
            | (Selected, Running)
            | (Selected, Waiting)
            | (Selected, Canceled)
            | (Running, Waiting)
            | (Running, Completed)
            | (Running, Interrupted)
            | (Running, Canceled)
    )
}
