//! Per-job timing record.

/// Timing data for one job, keyed by name in [`crate::MetricsRecorder`].
///
/// `startTime`/`completionTime` are `0` until the corresponding event has
/// been recorded, matching spec.md's "0 if unstarted"/"0 if not completed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsRecord {
    /// Simulated CPU seconds requested.
    pub cpu_time: u64,
    /// Scheduling priority.
    pub priority: u32,
    /// Epoch ms the job was submitted.
    pub arrival_time: i64,
    /// Epoch ms the job started running, or `0` if it hasn't yet.
    pub start_time: i64,
    /// Epoch ms the job completed, or `0` if it hasn't yet.
    pub completion_time: i64,
}

impl MetricsRecord {
    pub(crate) fn new(cpu_time: u64, priority: u32, arrival_time: i64) -> Self {
        Self {
            cpu_time,
            priority,
            arrival_time,
            start_time: 0,
            completion_time: 0,
        }
    }

    /// `startTime - arrivalTime`, or `0` if the job hasn't started.
    #[must_use]
    pub fn wait_time(&self) -> i64 {
        if self.start_time == 0 {
            0
        } else {
            self.start_time - self.arrival_time
        }
    }

    /// `completionTime - startTime`, or `0` if the job hasn't completed.
    #[must_use]
    pub fn actual_cpu_time(&self) -> i64 {
        if self.completion_time == 0 || self.start_time == 0 {
            0
        } else {
            self.completion_time - self.start_time
        }
    }

    /// `completionTime - arrivalTime`, or `0` if the job hasn't completed.
    #[must_use]
    pub fn turnaround_time(&self) -> i64 {
        if self.completion_time == 0 {
            0
        } else {
            self.completion_time - self.arrival_time
        }
    }
}
