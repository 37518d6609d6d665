//! The bare pending sequence plus the single running slot.
//!
//! `JobQueue` guarantees each of its own operations is atomic but makes no
//! promise across operations — that composite-invariant enforcement
//! (needs-sort tracking, lock discipline across a whole submit/pop/
//! transition sequence) is [`crate::manager::QueueManager`]'s job. Nothing
//! outside this crate should construct or touch a `JobQueue` directly; the
//! engine only ever hands out a `QueueManager`.
//!
//! Ordering is deliberately *not* built into this structure: insertion
//! always appends to the tail and retrieval always removes from the head.
//! A `BinaryHeap` would reorder on every push, which is exactly the
//! "sorted container" approach the engine specification asks this engine
//! to avoid in favor of a dirty flag plus periodic re-sort (see
//! `Scheduler`).

use std::collections::VecDeque;
use std::sync::Arc;

use csubatch_core::Job;
use parking_lot::Mutex;

/// The pending sequence plus an at-most-one "running" slot.
#[derive(Default)]
pub struct JobQueue {
    pending: Mutex<VecDeque<Arc<Job>>>,
    running: Mutex<Option<Arc<Job>>>,
}

impl JobQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `job` to the tail of the pending sequence.
    pub fn add(&self, job: Arc<Job>) {
        self.pending.lock().push_back(job);
    }

    /// Removes and returns the head of the pending sequence, or `None` if
    /// empty.
    pub fn poll_head(&self) -> Option<Arc<Job>> {
        self.pending.lock().pop_front()
    }

    /// Returns the head of the pending sequence without removing it.
    #[must_use]
    pub fn peek_head(&self) -> Option<Arc<Job>> {
        self.pending.lock().front().cloned()
    }

    /// Number of pending jobs (excludes the running slot).
    #[must_use]
    pub fn size(&self) -> usize {
        self.pending.lock().len()
    }

    /// `true` if there are no pending jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// A copy of the pending sequence in its current order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Job>> {
        self.pending.lock().iter().cloned().collect()
    }

    /// Atomically replaces the pending sequence with `seq`, preserving its
    /// order.
    pub fn replace_all(&self, seq: Vec<Arc<Job>>) {
        *self.pending.lock() = seq.into();
    }

    /// Removes the first job for which `predicate` returns `true`.
    pub fn remove_where(&self, predicate: impl Fn(&Job) -> bool) -> Option<Arc<Job>> {
        let mut pending = self.pending.lock();
        let index = pending.iter().position(|job| predicate(job))?;
        pending.remove(index)
    }

    /// Sets the running slot. Does not check whether it was already
    /// occupied — callers (via `QueueManager`) only ever call this right
    /// after popping a job, when the slot is known to be empty.
    pub fn set_running(&self, job: Arc<Job>) {
        *self.running.lock() = Some(job);
    }

    /// Clears and returns the running slot's previous contents, if any.
    pub fn clear_running(&self) -> Option<Arc<Job>> {
        self.running.lock().take()
    }

    /// Returns a clone of the job currently in the running slot, if any.
    #[must_use]
    pub fn get_running(&self) -> Option<Arc<Job>> {
        self.running.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csubatch_core::JobStatus;

    fn job(name: &str, cpu_time: u64, priority: u32, arrival: i64) -> Arc<Job> {
        Arc::new(Job::new(name, cpu_time, priority, arrival))
    }

    #[test]
    fn fifo_order_is_preserved() {
        let queue = JobQueue::new();
        queue.add(job("a", 1, 0, 1));
        queue.add(job("b", 1, 0, 2));
        queue.add(job("c", 1, 0, 3));

        assert_eq!(queue.poll_head().unwrap().name(), "a");
        assert_eq!(queue.poll_head().unwrap().name(), "b");
        assert_eq!(queue.poll_head().unwrap().name(), "c");
        assert!(queue.poll_head().is_none());
    }

    #[test]
    fn peek_does_not_remove() {
        let queue = JobQueue::new();
        queue.add(job("a", 1, 0, 1));
        assert_eq!(queue.peek_head().unwrap().name(), "a");
        assert_eq!(queue.size(), 1);
    }

    #[test]
    fn replace_all_preserves_given_order() {
        let queue = JobQueue::new();
        queue.add(job("a", 1, 0, 1));
        queue.add(job("b", 1, 0, 2));

        let reordered = vec![job("z", 1, 0, 3), job("y", 1, 0, 4)];
        queue.replace_all(reordered);

        assert_eq!(queue.poll_head().unwrap().name(), "z");
        assert_eq!(queue.poll_head().unwrap().name(), "y");
    }

    #[test]
    fn running_slot_holds_at_most_one_job() {
        let queue = JobQueue::new();
        assert!(queue.get_running().is_none());

        let j = job("a", 1, 0, 1);
        j.set_status_unchecked(JobStatus::Running);
        queue.set_running(j.clone());

        assert_eq!(queue.get_running().unwrap().name(), "a");
        assert_eq!(queue.clear_running().unwrap().name(), "a");
        assert!(queue.get_running().is_none());
    }

    #[test]
    fn remove_where_finds_first_match_by_id() {
        let queue = JobQueue::new();
        let target = job("target", 1, 0, 1);
        queue.add(target.clone());
        queue.add(job("other", 1, 0, 2));

        let removed = queue.remove_where(|j| j.id() == target.id());
        assert_eq!(removed.unwrap().id(), target.id());
        assert_eq!(queue.size(), 1);
    }
}
