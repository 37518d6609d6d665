//! # CSUbatch Engine
//!
//! The facade that owns construction and teardown of a whole batch
//! scheduling engine: queue manager, job state manager, scheduler,
//! dispatcher, and metrics recorder, wired together behind the submission
//! interface the engine specification describes. There is no global/
//! singleton engine; every `Engine` is an explicit value callers construct
//! and hold for as long as they need it.

#![warn(missing_docs)]
#![warn(unused)]

mod engine;

pub use engine::Engine;

pub use csubatch_core::{EngineError, EngineResult, EventSink, Job, JobStatus, Level};
pub use csubatch_events::{JobObserver, JobStateEvent, ObserverId};
pub use csubatch_infra::{init_logging, EngineConfig, TracingEventSink};
pub use csubatch_metrics::MetricsRecord;
pub use csubatch_scheduler::Policy;
