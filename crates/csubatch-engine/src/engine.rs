//! The `Engine` facade.

use std::sync::Arc;

use csubatch_core::{EngineError, EngineResult, EventSink, Job, ValidationError};
use csubatch_dispatcher::{Dispatcher, DispatcherConfig};
use csubatch_events::{JobObserver, ObserverId};
use csubatch_infra::{EngineConfig, TracingEventSink};
use csubatch_metrics::MetricsRecorder;
use csubatch_queue::{CancelToken, QueueManager};
use csubatch_scheduler::{Policy, Scheduler};
use csubatch_state::JobStateManager;
use tokio::task::JoinHandle;

/// An explicit, owned batch scheduling engine.
///
/// Construction spawns the scheduler's background re-sort task and the
/// dispatcher's execution task onto the ambient Tokio runtime; both are
/// stopped cooperatively by [`Engine::shutdown`]. There is exactly one
/// `QueueManager`/`JobStateManager` pair per `Engine`, and nothing outside
/// this facade is ever handed the raw collaborators.
pub struct Engine {
    queue: Arc<QueueManager>,
    state: Arc<JobStateManager>,
    scheduler: Arc<Scheduler>,
    metrics: Arc<MetricsRecorder>,
    dispatcher: Arc<Dispatcher>,
    scheduler_cancel: Arc<CancelToken>,
    scheduler_tick: std::time::Duration,
    scheduler_handle: JoinHandle<()>,
    dispatcher_handle: JoinHandle<()>,
}

impl Engine {
    /// Builds an engine from `config`, reporting rejected transitions and
    /// observer failures through `sink`, and spawns its background tasks.
    ///
    /// Must be called from within a running Tokio runtime.
    #[must_use]
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Self {
        let state = Arc::new(JobStateManager::new(sink.clone()));
        let queue = Arc::new(QueueManager::new(state.clone()));
        let scheduler = Arc::new(Scheduler::new(queue.clone(), config.initial_policy));
        let metrics = Arc::new(MetricsRecorder::new(now()));

        let dispatcher_config = DispatcherConfig {
            cpu_time_slice: config.cpu_time_slice,
            idle: std::time::Duration::from_millis(config.dispatcher_idle_ms),
        };
        let dispatcher = Arc::new(Dispatcher::new(
            queue.clone(),
            state.clone(),
            metrics.clone(),
            sink,
            dispatcher_config,
        ));

        let scheduler_tick = std::time::Duration::from_millis(config.scheduler_tick_ms);
        let scheduler_cancel = CancelToken::new();

        let scheduler_handle = {
            let scheduler = scheduler.clone();
            let cancel = scheduler_cancel.clone();
            tokio::spawn(async move {
                scheduler.run(scheduler_tick, &cancel).await;
            })
        };

        let dispatcher_handle = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.run().await;
            })
        };

        Self {
            queue,
            state,
            scheduler,
            metrics,
            dispatcher,
            scheduler_cancel,
            scheduler_tick,
            scheduler_handle,
            dispatcher_handle,
        }
    }

    /// Builds an engine with the default `tracing`-backed sink.
    #[must_use]
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(TracingEventSink))
    }

    /// Validates and submits a new job, returning the handle the caller can
    /// hold onto for lookups or cancellation.
    ///
    /// `cpu_time`/`priority` are taken as signed so out-of-range input (a
    /// negative value) can be rejected with a precise error rather than
    /// silently wrapping when narrowed to the engine's internal unsigned
    /// representation.
    pub fn submit(
        &self,
        name: impl Into<String>,
        cpu_time: i64,
        priority: i64,
    ) -> EngineResult<Arc<Job>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::Validation(ValidationError::EmptyName));
        }
        if cpu_time <= 0 {
            return Err(EngineError::Validation(ValidationError::NonPositiveCpuTime(
                cpu_time,
            )));
        }
        if priority < 0 {
            return Err(EngineError::Validation(ValidationError::NegativePriority(
                priority,
            )));
        }

        let arrival_time = now();
        #[allow(clippy::cast_sign_loss)]
        let job = Arc::new(Job::new(
            name,
            cpu_time as u64,
            priority as u32,
            arrival_time,
        ));

        self.metrics
            .on_submit(job.name(), job.cpu_time(), job.priority(), arrival_time);
        self.queue.add(job.clone(), "Submitter")?;
        Ok(job)
    }

    /// An ordered snapshot: the running job (if any) first, then the
    /// pending sequence in its current order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Job>> {
        let mut jobs = Vec::new();
        if let Some(running) = self.queue.get_running() {
            jobs.push(running);
        }
        jobs.extend(self.queue.snapshot());
        jobs
    }

    /// Looks a job up by name among the pending sequence, then the running
    /// slot.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<Job>> {
        self.queue.get_by_name(name)
    }

    /// Switches the active ordering policy, re-sorting the pending sequence
    /// immediately.
    pub fn set_policy(&self, policy: Policy) {
        self.scheduler.set_policy(policy);
    }

    /// The policy currently in effect.
    #[must_use]
    pub fn current_policy(&self) -> Policy {
        self.scheduler.current_policy()
    }

    /// Removes a pending job by name, transitioning it to `CANCELED`.
    /// Returns whether anything was removed (a job already running or
    /// already terminal is left alone).
    pub fn remove(&self, name: &str) -> EngineResult<bool> {
        self.queue.remove_by_name(name, "Submitter")
    }

    /// A snapshot of the aggregate performance metrics recorded so far.
    #[must_use]
    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// Registers an observer notified synchronously on every validated
    /// status transition.
    pub fn subscribe(&self, observer: Arc<dyn JobObserver>) -> ObserverId {
        self.state.subscribe(observer)
    }

    /// Removes a previously registered observer.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.state.unsubscribe(id);
    }

    /// Stops the scheduler and dispatcher tasks cooperatively and waits for
    /// both to exit. A job that is mid-run when `shutdown` is called still
    /// completes its transition to `INTERRUPTED` before this returns.
    pub async fn shutdown(self) {
        self.scheduler_cancel.cancel();
        self.dispatcher.stop();
        let _ = tokio::join!(self.scheduler_handle, self.dispatcher_handle);
    }

    /// The interval between background re-sort checks, for diagnostics.
    #[must_use]
    pub fn scheduler_tick(&self) -> std::time::Duration {
        self.scheduler_tick
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csubatch_core::{JobStatus, NullEventSink};
    use std::time::Duration;

    fn engine() -> Engine {
        Engine::new(
            EngineConfig {
                scheduler_tick_ms: 5,
                dispatcher_idle_ms: 5,
                ..EngineConfig::default()
            },
            Arc::new(NullEventSink),
        )
    }

    #[tokio::test]
    async fn submit_rejects_invalid_input() {
        let engine = engine();
        assert!(matches!(
            engine.submit("  ", 1, 0),
            Err(EngineError::Validation(ValidationError::EmptyName))
        ));
        assert!(matches!(
            engine.submit("ok", 0, 0),
            Err(EngineError::Validation(ValidationError::NonPositiveCpuTime(0)))
        ));
        assert!(matches!(
            engine.submit("ok", 1, -1),
            Err(EngineError::Validation(ValidationError::NegativePriority(-1)))
        ));
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn a_submitted_job_runs_to_completion() {
        let engine = engine();
        let job = engine.submit("quick", 1, 0).unwrap();

        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if job.status() == JobStatus::Completed {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("job should complete promptly");

        assert_eq!(engine.metrics().total_completed(), 1);
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn list_reflects_pending_order() {
        let engine = engine();
        engine.submit("a", 100, 0).unwrap();
        engine.submit("b", 100, 0).unwrap();

        let names: Vec<_> = engine
            .list()
            .into_iter()
            .map(|j| j.name().to_string())
            .collect();
        assert!(names.contains(&"a".to_string()));
        assert!(names.contains(&"b".to_string()));
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn remove_cancels_a_pending_job() {
        let engine = engine();
        let job = engine.submit("cancel-me", 100, 0).unwrap();
        assert!(engine.remove("cancel-me").unwrap());
        assert_eq!(job.status(), JobStatus::Canceled);
        engine.shutdown().await;
    }

    /// Submits three jobs under `policy` and returns the names in the
    /// order their `COMPLETED` transition was observed, by subscribing an
    /// observer before any of them run.
    async fn completion_order(
        policy: Policy,
        jobs: &[(&str, i64, i64)],
    ) -> Vec<String> {
        let engine = engine();
        engine.set_policy(policy);

        let completed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let completed_clone = completed.clone();
        engine.subscribe(Arc::new(move |event: &csubatch_events::JobStateEvent| {
            if event.new_status == JobStatus::Completed {
                completed_clone.lock().push(event.job.name().to_string());
            }
        }));

        for (name, cpu_time, priority) in jobs {
            engine.submit(*name, *cpu_time, *priority).unwrap();
        }

        // Simulated cpu_time is slept in (virtual, paused) real time with no
        // slicing, so the bound must cover the sum of every job's cpu_time,
        // not just the slowest one.
        let bound: u64 = jobs.iter().map(|(_, cpu_time, _)| *cpu_time as u64).sum::<u64>() + 5;
        tokio::time::timeout(Duration::from_secs(bound), async {
            loop {
                if completed.lock().len() == jobs.len() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("all jobs should complete promptly");

        engine.shutdown().await;
        completed.lock().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_a_fcfs_completes_in_submission_order() {
        let order = completion_order(
            Policy::Fcfs,
            &[("j1", 1, 1), ("j2", 1, 2), ("j3", 1, 3)],
        )
        .await;
        assert_eq!(order, vec!["j1", "j2", "j3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_b_sjf_completes_shortest_first() {
        let order = completion_order(
            Policy::Sjf,
            &[("j1", 3, 1), ("j2", 1, 2), ("j3", 5, 3)],
        )
        .await;
        assert_eq!(order, vec!["j2", "j1", "j3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_c_priority_completes_smallest_value_first() {
        let order = completion_order(
            Policy::Priority,
            &[("j1", 1, 3), ("j2", 1, 1), ("j3", 1, 2)],
        )
        .await;
        assert_eq!(order, vec!["j2", "j3", "j1"]);
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_running_job() {
        let engine = engine();
        let job = engine.submit("long", 3600, 0).unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while job.status() != JobStatus::Running {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("job should start running");

        engine.shutdown().await;
        assert_eq!(job.status(), JobStatus::Interrupted);
    }
}
