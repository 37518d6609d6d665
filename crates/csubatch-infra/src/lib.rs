//! # CSUbatch Infra
//!
//! The ambient collaborators the engine specification leaves external:
//! process-wide logging setup, configuration loading, and the default
//! `tracing`-backed [`csubatch_core::EventSink`] implementation. None of
//! this is scheduling logic; it is the plumbing `csubatch-engine` wires in
//! by default so the crate is runnable out of the box.

#![warn(missing_docs)]
#![warn(unused)]

mod config;
mod logging;
mod sink;

pub use config::{EngineConfig, DEFAULT_DISPATCHER_IDLE_MS, DEFAULT_SCHEDULER_TICK_MS};
pub use logging::init_logging;
pub use sink::TracingEventSink;
