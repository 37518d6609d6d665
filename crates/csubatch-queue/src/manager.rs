//! The single-writer facade every other component submits, pops, and
//! reorders jobs through.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use csubatch_core::{EngineResult, Job, JobStatus};
use csubatch_state::JobStateManager;

use crate::cancel::CancelToken;
use crate::queue::JobQueue;

/// The `source` value the `Scheduler` passes when it re-sorts the pending
/// sequence. Mutations tagged with this source never set `needs_sort`,
/// since they're the sort itself, not something that requires one.
pub const SCHEDULER_SORT_SOURCE: &str = "Scheduler-Sort";

/// The only component that holds the queue's mutual-exclusion primitive.
///
/// `JobQueue` makes each of its own operations atomic; `QueueManager` is
/// the sole owner of the one `JobQueue` instance in a running engine, so in
/// practice nothing outside this type ever touches the primitive directly.
pub struct QueueManager {
    queue: JobQueue,
    state: Arc<JobStateManager>,
    needs_sort: AtomicBool,
}

impl QueueManager {
    /// Creates a manager over a fresh, empty queue.
    #[must_use]
    pub fn new(state: Arc<JobStateManager>) -> Self {
        Self {
            queue: JobQueue::new(),
            state,
            needs_sort: AtomicBool::new(false),
        }
    }

    /// Appends `job`, coercing its status to `WAITING` first if it isn't
    /// already (e.g. a job handed back in after being popped). Sets
    /// `needs_sort` unless `source` is [`SCHEDULER_SORT_SOURCE`].
    pub fn add(&self, job: Arc<Job>, source: &str) -> EngineResult<()> {
        if job.status() != JobStatus::Waiting {
            self.state
                .update_status(&job, JobStatus::Waiting, source, "coerced to WAITING on add")?;
        }
        self.queue.add(job);
        self.mark_dirty_unless_sort(source);
        Ok(())
    }

    /// Re-appends a job the dispatcher is putting back (time-slice
    /// reschedule). Unlike [`Self::add`], the caller is expected to have
    /// already transitioned the job to `WAITING` itself.
    pub fn reschedule(&self, job: Arc<Job>, source: &str) -> EngineResult<()> {
        self.queue.add(job);
        self.mark_dirty_unless_sort(source);
        Ok(())
    }

    /// Blocks until a job is available or `cancel` is triggered, polling
    /// every `idle` interval without holding any lock while asleep.
    pub async fn retrieve(
        &self,
        idle: Duration,
        cancel: &CancelToken,
    ) -> EngineResult<Arc<Job>> {
        loop {
            if let Some(job) = self.queue.poll_head() {
                return Ok(job);
            }
            if cancel.is_cancelled() {
                return Err(csubatch_core::EngineError::Cancelled);
            }
            cancel.sleep_or_cancelled(idle).await;
        }
    }

    /// Removes the first pending job with the same identity as `job`,
    /// transitioning it to `CANCELED`. Returns whether anything was
    /// removed.
    pub fn remove(&self, job: &Arc<Job>, source: &str) -> EngineResult<bool> {
        self.remove_matching(|j| j.id() == job.id(), source)
    }

    /// Looks up by `name` equality, then removes as [`Self::remove`] would.
    pub fn remove_by_name(&self, name: &str, source: &str) -> EngineResult<bool> {
        self.remove_matching(|j| j.name() == name, source)
    }

    fn remove_matching(
        &self,
        predicate: impl Fn(&Job) -> bool,
        source: &str,
    ) -> EngineResult<bool> {
        match self.queue.remove_where(predicate) {
            Some(job) => {
                self.state
                    .update_status(&job, JobStatus::Canceled, source, "removed from queue")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Finds a job by name among pending jobs, then the running slot.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<Job>> {
        self.queue
            .snapshot()
            .into_iter()
            .find(|j| j.name() == name)
            .or_else(|| self.queue.get_running().filter(|j| j.name() == name))
    }

    /// An ordered copy of the pending sequence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Job>> {
        self.queue.snapshot()
    }

    /// Atomically replaces the pending sequence, preserving `seq`'s order.
    pub fn replace_all(&self, seq: Vec<Arc<Job>>, source: &str) {
        self.queue.replace_all(seq);
        self.mark_dirty_unless_sort(source);
    }

    /// Empties the pending sequence.
    pub fn clear(&self, source: &str) {
        self.queue.replace_all(Vec::new());
        self.mark_dirty_unless_sort(source);
    }

    /// The pending job with the smallest `cpuTime`, if any.
    #[must_use]
    pub fn get_shortest(&self) -> Option<Arc<Job>> {
        self.queue.snapshot().into_iter().min_by_key(Job::cpu_time)
    }

    /// The pending job with the smallest `priority` value, if any.
    #[must_use]
    pub fn get_highest_priority(&self) -> Option<Arc<Job>> {
        self.queue.snapshot().into_iter().min_by_key(Job::priority)
    }

    /// Number of pending jobs.
    #[must_use]
    pub fn size(&self) -> usize {
        self.queue.size()
    }

    /// `true` if there are no pending jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Occupies the running slot. Callers should have already popped the
    /// job via [`Self::retrieve`].
    pub fn set_running(&self, job: Arc<Job>) {
        self.queue.set_running(job);
    }

    /// Empties and returns the running slot's previous contents.
    pub fn clear_running(&self) -> Option<Arc<Job>> {
        self.queue.clear_running()
    }

    /// The job currently in the running slot, if any.
    #[must_use]
    pub fn get_running(&self) -> Option<Arc<Job>> {
        self.queue.get_running()
    }

    /// Direct flag access for the `Scheduler`.
    pub fn set_needs_sort(&self, value: bool) {
        self.needs_sort.store(value, Ordering::SeqCst);
    }

    /// Direct flag access for the `Scheduler`.
    #[must_use]
    pub fn is_needing_sort(&self) -> bool {
        self.needs_sort.load(Ordering::SeqCst)
    }

    fn mark_dirty_unless_sort(&self, source: &str) {
        if source != SCHEDULER_SORT_SOURCE {
            self.set_needs_sort(true);
        }
    }
}
