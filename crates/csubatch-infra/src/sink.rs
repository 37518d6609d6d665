//! The `tracing`-backed [`EventSink`] wired into the engine by default.

use csubatch_core::{EventSink, JobContext, Level};

/// Forwards every engine event to the global `tracing` subscriber.
///
/// Structured fields (`job`, `status`, `cpu_time`, `priority`) are attached
/// directly to the `tracing` event rather than interpolated into the
/// message, so they survive through to whatever formatter/exporter the
/// process has installed via [`crate::logging::init_logging`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!("{message}"),
            Level::Info => tracing::info!("{message}"),
            Level::Warn => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
    }

    fn log_job(&self, level: Level, job: &JobContext, message: &str) {
        match level {
            Level::Debug => tracing::debug!(
                job = %job.name, status = %job.status, cpu_time = job.cpu_time,
                priority = job.priority, "{message}"
            ),
            Level::Info => tracing::info!(
                job = %job.name, status = %job.status, cpu_time = job.cpu_time,
                priority = job.priority, "{message}"
            ),
            Level::Warn => tracing::warn!(
                job = %job.name, status = %job.status, cpu_time = job.cpu_time,
                priority = job.priority, "{message}"
            ),
            Level::Error => tracing::error!(
                job = %job.name, status = %job.status, cpu_time = job.cpu_time,
                priority = job.priority, "{message}"
            ),
        }
    }
}
