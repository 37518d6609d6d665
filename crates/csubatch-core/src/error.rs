//! Engine-wide error taxonomy.
//!
//! One enum covers every kind spec'd for the engine: validation failures at
//! submission, rejected state transitions, name-keyed lookup misses,
//! cooperative cancellation, and internal retry conditions. Components
//! return `EngineResult<T>` rather than inventing a per-crate error type,
//! since the taxonomy is shared across the whole engine, not per-component.

use thiserror::Error;

use crate::job::JobStatus;

/// Result alias used throughout the engine.
pub type EngineResult<T = ()> = Result<T, EngineError>;

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A submitted job failed validation before it ever entered the engine.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A requested status transition is not allowed by the state table.
    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status the job was in when the transition was attempted.
        from: JobStatus,
        /// Status the caller requested.
        to: JobStatus,
    },

    /// A name-keyed lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Cooperative cancellation was observed during a blocking wait.
    #[error("operation cancelled")]
    Cancelled,

    /// An internal condition that should be retried with backoff, never
    /// escalated to a caller (e.g. the queue looked non-empty and then was
    /// empty by the time of the actual pop).
    #[error("transient: {0}")]
    TransientUnavailable(String),
}

/// Reasons a job submission is rejected before it reaches the queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The job name was empty or all whitespace.
    #[error("job name must not be empty or whitespace")]
    EmptyName,

    /// `cpuTime` must be a positive number of seconds.
    #[error("cpu time must be positive, got {0}")]
    NonPositiveCpuTime(i64),

    /// `priority` must be zero or greater.
    #[error("priority must be non-negative, got {0}")]
    NegativePriority(i64),
}
