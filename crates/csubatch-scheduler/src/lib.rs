//! # CSUbatch Scheduler
//!
//! Policy definitions and the background reorderer that keeps the pending
//! queue sorted under the active policy.

#![warn(missing_docs)]
#![warn(unused)]

pub mod policy;
pub mod scheduler;

pub use policy::Policy;
pub use scheduler::{DEFAULT_TICK, Scheduler};

#[cfg(any(test, feature = "testing"))]
mod proptests {
    use super::policy::{self, Policy};
    use csubatch_core::Job;
    use proptest::prelude::*;

    proptest! {
        // Invariant 3 (sort stability): after sorting under any policy,
        // jobs with an equal policy key keep their submission order.
        #[test]
        fn sort_is_stable_for_equal_keys(
            specs in proptest::collection::vec((0u64..5, 0u32..3, 0i64..5), 1..30),
        ) {
            let jobs: Vec<_> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (cpu, pri, arrival))| {
                    Job::new(format!("job-{i}"), cpu, pri, arrival * 1000 + i as i64)
                })
                .collect();

            for policy in [Policy::Fcfs, Policy::Sjf, Policy::Priority] {
                let mut sorted: Vec<&Job> = jobs.iter().collect();
                sorted.sort_by(|a, b| policy::compare(policy, a, b));

                for window in sorted.windows(2) {
                    let (a, b) = (window[0], window[1]);
                    let key = |j: &Job| match policy {
                        Policy::Fcfs => j.arrival_time(),
                        Policy::Sjf => j.cpu_time() as i64,
                        Policy::Priority => i64::from(j.priority()),
                    };
                    if key(a) == key(b) {
                        prop_assert!(a.arrival_time() <= b.arrival_time());
                    } else {
                        prop_assert!(key(a) <= key(b));
                    }
                }
            }
        }
    }
}
