//! The immutable record published on every validated status transition.

use std::sync::Arc;

use csubatch_core::{Job, JobStatus};

/// A record of one validated `Job` status transition.
///
/// Carries the job reference rather than a copy so observers can read any
/// of its other fields (including its *current*, post-transition status)
/// without a second lookup.
#[derive(Debug, Clone)]
pub struct JobStateEvent {
    /// The job that transitioned.
    pub job: Arc<Job>,
    /// Status before the transition.
    pub old_status: JobStatus,
    /// Status after the transition.
    pub new_status: JobStatus,
    /// Who requested the transition (e.g. `"Dispatcher"`, `"Scheduler-Sort"`).
    pub source: String,
    /// Human-readable detail for logs/diagnostics.
    pub message: String,
}

impl JobStateEvent {
    /// Builds a new event record.
    #[must_use]
    pub fn new(
        job: Arc<Job>,
        old_status: JobStatus,
        new_status: JobStatus,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job,
            old_status,
            new_status,
            source: source.into(),
            message: message.into(),
        }
    }
}
