//! # CSUbatch Metrics
//!
//! Per-job arrival/start/completion timestamps and the aggregate
//! performance numbers derived from them.

#![warn(missing_docs)]
#![warn(unused)]

mod record;

pub use record::MetricsRecord;

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use parking_lot::RwLock;

/// Keyed-by-name recorder of per-job timestamps, plus the aggregates
/// derived from them. Every operation is safe to call concurrently;
/// updates that reference an unknown job name are silently ignored.
pub struct MetricsRecorder {
    records: RwLock<HashMap<String, MetricsRecord>>,
    total_completed: AtomicUsize,
    system_start_time: i64,
    last_reset_time: AtomicI64,
}

impl MetricsRecorder {
    /// Creates a recorder whose clock starts at `now` (epoch ms).
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            total_completed: AtomicUsize::new(0),
            system_start_time: now,
            last_reset_time: AtomicI64::new(now),
        }
    }

    /// Epoch ms this recorder was created.
    #[must_use]
    pub fn system_start_time(&self) -> i64 {
        self.system_start_time
    }

    /// Creates (or overwrites) the record for `name`.
    pub fn on_submit(&self, name: &str, cpu_time: u64, priority: u32, arrival_time: i64) {
        self.records.write().insert(
            name.to_string(),
            MetricsRecord::new(cpu_time, priority, arrival_time),
        );
    }

    /// Records that `name` started running at `t`. No-op if `name` is
    /// unknown.
    pub fn on_start(&self, name: &str, t: i64) {
        if let Some(record) = self.records.write().get_mut(name) {
            record.start_time = t;
        }
    }

    /// Records that `name` completed at `t` and increments the completed
    /// counter. No-op if `name` is unknown.
    pub fn on_completion(&self, name: &str, t: i64) {
        let mut records = self.records.write();
        if let Some(record) = records.get_mut(name) {
            record.completion_time = t;
            drop(records);
            self.total_completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Average turnaround time over completed jobs, `0` if none have
    /// completed.
    #[must_use]
    pub fn avg_turnaround(&self) -> f64 {
        self.average_of(MetricsRecord::turnaround_time)
    }

    /// Average wait time over completed jobs, `0` if none have completed.
    #[must_use]
    pub fn avg_waiting(&self) -> f64 {
        self.average_of(MetricsRecord::wait_time)
    }

    /// Average actual CPU time over completed jobs, `0` if none have
    /// completed.
    #[must_use]
    pub fn avg_cpu(&self) -> f64 {
        self.average_of(MetricsRecord::actual_cpu_time)
    }

    fn average_of(&self, metric: impl Fn(&MetricsRecord) -> i64) -> f64 {
        let records = self.records.read();
        let completed: Vec<_> = records.values().filter(|r| r.completion_time > 0).collect();
        if completed.is_empty() {
            return 0.0;
        }
        let total: i64 = completed.iter().map(|r| metric(r)).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg = total as f64 / completed.len() as f64;
        avg
    }

    /// Completed-jobs per elapsed second since the last reset (or since
    /// construction, if never reset).
    #[must_use]
    pub fn throughput(&self, now: i64) -> f64 {
        let elapsed_ms = now - self.last_reset_time.load(Ordering::SeqCst);
        if elapsed_ms <= 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let elapsed_secs = elapsed_ms as f64 / 1000.0;
        #[allow(clippy::cast_precision_loss)]
        let completed = self.total_completed.load(Ordering::SeqCst) as f64;
        completed / elapsed_secs
    }

    /// Total completions recorded since the last reset.
    #[must_use]
    pub fn total_completed(&self) -> usize {
        self.total_completed.load(Ordering::SeqCst)
    }

    /// Clears every per-job record and the completed counter, preserves
    /// `system_start_time`, and sets the reset clock to `now`.
    pub fn reset(&self, now: i64) {
        self.records.write().clear();
        self.total_completed.store(0, Ordering::SeqCst);
        self.last_reset_time.store(now, Ordering::SeqCst);
    }

    /// A copy of every per-job record, keyed by name.
    #[must_use]
    pub fn snapshot_map(&self) -> HashMap<String, MetricsRecord> {
        self.records.read().clone()
    }

    /// Merges `other` into this recorder's records, overwriting on
    /// conflicting names. Used by tests that save and restore metrics
    /// state; does not touch the completed counter or reset clock.
    pub fn merge_map(&self, other: HashMap<String, MetricsRecord>) {
        self.records.write().extend(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_for_a_single_job() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("build", 5, 1, 1_000);
        recorder.on_start("build", 1_500);
        recorder.on_completion("build", 2_500);

        let record = recorder.snapshot_map()["build"];
        assert_eq!(record.wait_time(), 500);
        assert_eq!(record.actual_cpu_time(), 1_000);
        assert_eq!(record.turnaround_time(), 1_500);
        assert_eq!(recorder.total_completed(), 1);
    }

    #[test]
    fn metrics_identities_hold_for_every_completed_job() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("j1", 5, 1, 1_000);
        recorder.on_start("j1", 1_200);
        recorder.on_completion("j1", 6_200);

        let record = recorder.snapshot_map()["j1"];
        assert!(record.wait_time() >= 0);
        assert!(record.actual_cpu_time() >= 0);
        assert_eq!(
            record.turnaround_time(),
            record.wait_time() + record.actual_cpu_time()
        );
    }

    #[test]
    fn unknown_name_updates_are_silently_ignored() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_start("ghost", 100);
        recorder.on_completion("ghost", 200);
        assert!(recorder.snapshot_map().is_empty());
        assert_eq!(recorder.total_completed(), 0);
    }

    #[test]
    fn averages_are_zero_with_no_completions() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("j1", 5, 1, 0);
        assert_eq!(recorder.avg_turnaround(), 0.0);
        assert_eq!(recorder.avg_waiting(), 0.0);
        assert_eq!(recorder.avg_cpu(), 0.0);
    }

    #[test]
    fn averages_cover_only_completed_jobs() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("done", 4, 1, 0);
        recorder.on_start("done", 0);
        recorder.on_completion("done", 4_000);

        recorder.on_submit("pending", 4, 1, 0);
        recorder.on_start("pending", 0);

        assert_eq!(recorder.avg_turnaround(), 4_000.0);
        assert_eq!(recorder.avg_cpu(), 4_000.0);
    }

    #[test]
    fn throughput_is_completions_per_elapsed_second() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("j1", 1, 0, 0);
        recorder.on_start("j1", 0);
        recorder.on_completion("j1", 1_000);

        assert_eq!(recorder.throughput(2_000), 0.5);
    }

    #[test]
    fn reset_clears_records_but_keeps_system_start_time() {
        let recorder = MetricsRecorder::new(42);
        recorder.on_submit("j1", 1, 0, 0);
        recorder.on_completion("j1", 1);

        recorder.reset(5_000);

        assert!(recorder.snapshot_map().is_empty());
        assert_eq!(recorder.total_completed(), 0);
        assert_eq!(recorder.system_start_time(), 42);
        assert_eq!(recorder.throughput(5_000), 0.0);
    }

    #[test]
    fn merge_map_restores_a_saved_snapshot() {
        let recorder = MetricsRecorder::new(0);
        recorder.on_submit("j1", 1, 0, 0);
        let saved = recorder.snapshot_map();

        let restored = MetricsRecorder::new(0);
        restored.merge_map(saved);
        assert_eq!(restored.snapshot_map().len(), 1);
    }
}
