//! The `EventSink` capability the logging collaborator implements.
//!
//! The engine never formats file paths or handles rotation; it only emits
//! structured events at one of four levels, optionally carrying a snapshot
//! of the job involved. `csubatch-infra` ships the `tracing`-backed
//! implementation used by `Engine::new`.

use crate::job::{Job, JobStatus};

/// Severity of a structured event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Verbose, development-only detail.
    Debug,
    /// Routine operational detail.
    Info,
    /// Something unexpected but non-fatal (e.g. a rejected transition).
    Warn,
    /// A condition that indicates a bug or a broken collaborator.
    Error,
}

/// An immutable snapshot of the job a log event is about.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// The job's display name.
    pub name: String,
    /// Simulated CPU seconds.
    pub cpu_time: u64,
    /// Scheduling priority.
    pub priority: u32,
    /// Status at the moment the event was produced.
    pub status: JobStatus,
}

impl JobContext {
    /// Snapshots the fields of `job` relevant to a log event.
    #[must_use]
    pub fn from_job(job: &Job) -> Self {
        Self {
            name: job.name().to_string(),
            cpu_time: job.cpu_time(),
            priority: job.priority(),
            status: job.status(),
        }
    }
}

/// Structured-event sink consumed by the engine, supplied by the logging
/// collaborator (out of scope for this crate: no file rotation, no on-disk
/// format — just the two logging capabilities the engine needs).
pub trait EventSink: Send + Sync {
    /// Emits a plain structured event.
    fn log(&self, level: Level, message: &str);

    /// Emits a structured event with job context attached. The default
    /// implementation folds the context into the message and forwards to
    /// [`EventSink::log`]; implementations that support structured fields
    /// (like `tracing`) should override this instead.
    fn log_job(&self, level: Level, job: &JobContext, message: &str) {
        self.log(
            level,
            &format!(
                "{message} (job={}, status={}, cpu_time={}, priority={})",
                job.name, job.status, job.cpu_time, job.priority
            ),
        );
    }
}

/// An `EventSink` that discards every event. Useful as a default in tests
/// that don't care about observability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn log(&self, _level: Level, _message: &str) {}
}
