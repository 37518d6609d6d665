//! The three total orders the `Scheduler` can apply to the pending
//! sequence.

use std::cmp::Ordering;

use csubatch_core::Job;
use serde::{Deserialize, Serialize};

/// A total order over pending jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Ascending `arrivalTime`.
    Fcfs,
    /// Ascending `cpuTime` ("shortest job first").
    Sjf,
    /// Ascending `priority` value — smaller means higher priority.
    Priority,
}

impl Default for Policy {
    fn default() -> Self {
        Self::Fcfs
    }
}

/// Compares two jobs under `policy`, breaking ties by `arrivalTime`.
///
/// Remaining ties (equal key *and* equal arrival time) are left as
/// `Ordering::Equal` deliberately: [`std::slice::sort_by`] is a stable
/// sort, so equal elements keep their relative (submission) order without
/// this function needing a third tiebreaker.
#[must_use]
pub fn compare(policy: Policy, a: &Job, b: &Job) -> Ordering {
    let primary = match policy {
        Policy::Fcfs => a.arrival_time().cmp(&b.arrival_time()),
        Policy::Sjf => a.cpu_time().cmp(&b.cpu_time()),
        Policy::Priority => a.priority().cmp(&b.priority()),
    };
    primary.then_with(|| a.arrival_time().cmp(&b.arrival_time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, cpu_time: u64, priority: u32, arrival: i64) -> Job {
        Job::new(name, cpu_time, priority, arrival)
    }

    #[test]
    fn fcfs_orders_by_arrival() {
        let early = job("a", 5, 1, 1_000);
        let late = job("b", 3, 2, 2_000);
        assert_eq!(compare(Policy::Fcfs, &early, &late), Ordering::Less);
    }

    #[test]
    fn sjf_orders_by_cpu_time_regardless_of_arrival() {
        let short = job("short", 2, 9, 9_000);
        let long = job("long", 9, 1, 1_000);
        assert_eq!(compare(Policy::Sjf, &short, &long), Ordering::Less);
    }

    #[test]
    fn priority_smaller_value_sorts_first() {
        let high = job("high", 5, 1, 1_000);
        let low = job("low", 5, 9, 2_000);
        assert_eq!(compare(Policy::Priority, &high, &low), Ordering::Less);
    }

    #[test]
    fn equal_keys_tiebreak_on_arrival_time() {
        let earlier = job("e", 5, 1, 1_000);
        let later = job("l", 5, 1, 2_000);
        assert_eq!(compare(Policy::Sjf, &earlier, &later), Ordering::Less);
        assert_eq!(compare(Policy::Priority, &earlier, &later), Ordering::Less);
    }
}
