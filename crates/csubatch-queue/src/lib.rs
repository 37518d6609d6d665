//! # CSUbatch Queue
//!
//! The thread-safe pending job sequence (`JobQueue`) and the
//! `QueueManager` facade that everything else in the engine submits, pops,
//! and reorders jobs through.

#![warn(missing_docs)]
#![warn(unused)]

pub mod cancel;
pub mod manager;
pub mod queue;

pub use cancel::CancelToken;
pub use manager::{QueueManager, SCHEDULER_SORT_SOURCE};
pub use queue::JobQueue;

#[cfg(any(test, feature = "testing"))]
mod proptests {
    use std::sync::Arc;

    use csubatch_core::Job;
    use proptest::prelude::*;

    use crate::queue::JobQueue;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Add(u8),
        PollHead,
        SetRunning(u8),
        ClearRunning,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..8).prop_map(Op::Add),
            Just(Op::PollHead),
            (0u8..8).prop_map(Op::SetRunning),
            Just(Op::ClearRunning),
        ]
    }

    proptest! {
        // Invariant 1 (unique residence): at every quiescent point, a live
        // job is either in the pending sequence or the running slot, never
        // both, never more than once overall.
        #[test]
        fn unique_residence_holds_after_any_op_sequence(ops in proptest::collection::vec(op_strategy(), 1..60)) {
            let queue = JobQueue::new();

            for op in ops {
                match op {
                    Op::Add(tag) => {
                        let job = Arc::new(Job::new(format!("job-{tag}"), 1, 0, i64::from(tag)));
                        queue.add(job);
                    }
                    Op::PollHead => {
                        let _ = queue.poll_head();
                    }
                    Op::SetRunning(tag) => {
                        let job = Arc::new(Job::new(format!("run-{tag}"), 1, 0, i64::from(tag)));
                        queue.set_running(job);
                    }
                    Op::ClearRunning => {
                        let _ = queue.clear_running();
                    }
                }

                let pending = queue.snapshot();
                let running = queue.get_running();

                let mut seen = std::collections::HashSet::new();
                for job in pending.iter().chain(running.iter()) {
                    prop_assert!(seen.insert(job.id()), "job {} present more than once", job.name());
                }
            }
        }
    }
}
