//! # CSUbatch Core
//!
//! Core domain types shared by every crate in the CSUbatch batch scheduling
//! engine: the `Job` descriptor and its status machine vocabulary, the
//! engine-wide error taxonomy, and the `EventSink` capability that the
//! logging collaborator implements.
//!
//! ## Architecture
//!
//! - `job`: `Job`, `JobStatus`
//! - `error`: `EngineError`, `ValidationError`
//! - `sink`: `EventSink`, `Level`, `JobContext`

#![warn(missing_docs)]
#![warn(unused)]

pub mod error;
pub mod job;
pub mod sink;

pub use error::{EngineError, EngineResult, ValidationError};
pub use job::{Job, JobStatus};
pub use sink::{EventSink, JobContext, Level, NullEventSink};
