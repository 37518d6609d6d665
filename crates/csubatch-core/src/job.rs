//! The `Job` descriptor and its status vocabulary.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A submitted unit of simulated work.
///
/// `id`, `name`, `cpu_time`, `priority`, and `arrival_time` are set at
/// creation and never change. `status` is the one mutable field, and it is
/// guarded by an internal lock because the same job is referenced
/// concurrently by the queue, the dispatcher, and the metrics recorder —
/// callers pass `Arc<Job>` around rather than cloning the struct.
///
/// `status` is only ever meant to be written by `JobStateManager`. Rust has
/// no package-private visibility, so the write path
/// ([`Job::set_status_unchecked`]) is `#[doc(hidden)]` and documented as
/// engine-internal instead of being enforced by the compiler.
#[derive(Debug)]
pub struct Job {
    id: Uuid,
    name: String,
    cpu_time: u64,
    priority: u32,
    arrival_time: i64,
    status: Mutex<JobStatus>,
}

impl Job {
    /// Creates a job with an explicit arrival time.
    ///
    /// Validation (non-empty name, positive `cpu_time`, non-negative
    /// `priority`) happens at the submission boundary, not here — tests and
    /// internal callers that already hold validated values construct a
    /// `Job` directly, and scenario tests need to pin exact arrival times.
    #[must_use]
    pub fn new(name: impl Into<String>, cpu_time: u64, priority: u32, arrival_time: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cpu_time,
            priority,
            arrival_time,
            status: Mutex::new(JobStatus::Waiting),
        }
    }

    /// Internal identity, distinct from `name` (two jobs may share a name).
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display/lookup name. Not guaranteed unique across jobs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simulated CPU work, in seconds.
    #[must_use]
    pub fn cpu_time(&self) -> u64 {
        self.cpu_time
    }

    /// Scheduling priority; smaller value means higher priority.
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Epoch millisecond timestamp assigned at submission.
    #[must_use]
    pub fn arrival_time(&self) -> i64 {
        self.arrival_time
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        *self.status.lock()
    }

    /// Writes the status without validating the transition.
    ///
    /// Only `JobStateManager` should call this; every other component must
    /// go through `JobStateManager::update_status` so transitions are
    /// validated and observers are notified.
    #[doc(hidden)]
    pub fn set_status_unchecked(&self, status: JobStatus) {
        *self.status.lock() = status;
    }
}

/// A job's position in its lifecycle.
///
/// `WAITING -> SELECTED -> RUNNING -> {COMPLETED | INTERRUPTED | CANCELED}`,
/// with `WAITING`/`SELECTED`/`RUNNING` each additionally able to go straight
/// to `CANCELED`, and `RUNNING` able to return to `WAITING` (time-slice
/// reschedule). See `JobStateManager` for the authoritative transition
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Sitting in the pending sequence, not yet picked up.
    Waiting,
    /// Popped by the dispatcher, about to start running.
    Selected,
    /// Actively being simulated on the CPU.
    Running,
    /// Finished all of its simulated CPU time.
    Completed,
    /// Stopped mid-run by cooperative cancellation.
    Interrupted,
    /// Removed from the engine before it could finish.
    Canceled,
}

impl JobStatus {
    /// Terminal statuses never transition again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Interrupted | JobStatus::Canceled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Waiting => "WAITING",
            JobStatus::Selected => "SELECTED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Interrupted => "INTERRUPTED",
            JobStatus::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_starts_waiting() {
        let job = Job::new("build", 5, 1, 1_000);
        assert_eq!(job.status(), JobStatus::Waiting);
        assert_eq!(job.name(), "build");
        assert_eq!(job.cpu_time(), 5);
        assert_eq!(job.priority(), 1);
        assert_eq!(job.arrival_time(), 1_000);
    }

    #[test]
    fn distinct_jobs_get_distinct_ids_even_with_same_name() {
        let a = Job::new("dup", 1, 0, 0);
        let b = Job::new("dup", 1, 0, 0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn set_status_unchecked_writes_through() {
        let job = Job::new("x", 1, 0, 0);
        job.set_status_unchecked(JobStatus::Running);
        assert_eq!(job.status(), JobStatus::Running);
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Interrupted.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(!JobStatus::Selected.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }
}
