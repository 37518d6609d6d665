//! # CSUbatch Dispatcher
//!
//! The single worker that pops jobs from the [`csubatch_queue::QueueManager`]
//! and simulates their CPU execution, time-slicing long jobs back onto the
//! pending sequence.

#![warn(missing_docs)]
#![warn(unused)]

mod dispatcher;

pub use dispatcher::{Dispatcher, DispatcherConfig};
