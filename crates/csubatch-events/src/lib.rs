//! # CSUbatch Events
//!
//! The `JobStateEvent` record `JobStateManager` publishes on every
//! successful transition, the `JobObserver` trait UI/diagnostics
//! collaborators implement, and the registry that delivers events to
//! observers synchronously while isolating one observer's panic from the
//! rest.

#![warn(missing_docs)]
#![warn(unused)]

pub mod event;
pub mod observer;
pub mod registry;

pub use event::JobStateEvent;
pub use observer::{JobObserver, ObserverId};
pub use registry::ObserverRegistry;
