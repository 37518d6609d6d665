//! The dispatcher's main loop: one tokio task owns exactly one running job
//! at a time and drives it through `SELECTED -> RUNNING ->
//! {COMPLETED | WAITING | INTERRUPTED}`.

use std::sync::Arc;
use std::time::Duration;

use csubatch_core::{EngineResult, EventSink, Job, JobContext, JobStatus, Level};
use csubatch_metrics::MetricsRecorder;
use csubatch_queue::{CancelToken, QueueManager};
use csubatch_state::JobStateManager;

/// Tuning knobs for a [`Dispatcher`].
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    /// Maximum simulated seconds a single pop gets to run before being
    /// rescheduled. `None` means a job always runs to completion in one
    /// pass, regardless of `cpu_time`.
    pub cpu_time_slice: Option<u64>,
    /// How long to sleep between polls of an empty queue.
    pub idle: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cpu_time_slice: None,
            idle: Duration::from_millis(100),
        }
    }
}

/// Pops, runs, and retires jobs one at a time.
///
/// `run` drives the loop until [`Dispatcher::stop`] is called (from any
/// thread/task); cancellation is cooperative, so a job that is mid-sleep
/// when `stop` is called still gets the chance to transition to
/// `INTERRUPTED` before the loop actually exits.
pub struct Dispatcher {
    queue: Arc<QueueManager>,
    state: Arc<JobStateManager>,
    metrics: Arc<MetricsRecorder>,
    sink: Arc<dyn EventSink>,
    config: DispatcherConfig,
    cancel: Arc<CancelToken>,
}

/// The `source` value the dispatcher passes to `JobStateManager` and
/// `QueueManager`.
const SOURCE: &str = "Dispatcher";

impl Dispatcher {
    /// Creates a dispatcher wired to the given collaborators.
    #[must_use]
    pub fn new(
        queue: Arc<QueueManager>,
        state: Arc<JobStateManager>,
        metrics: Arc<MetricsRecorder>,
        sink: Arc<dyn EventSink>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            queue,
            state,
            metrics,
            sink,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Requests a cooperative stop. Returns immediately; the running loop
    /// notices at its next suspension point.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Runs the main loop until [`Self::stop`] is called.
    ///
    /// Each iteration: retrieve the head of the pending sequence (blocking,
    /// with backoff, while the queue is empty), move it to `RUNNING`,
    /// simulate `min(cpu_time, cpu_time_slice)` seconds, then either retire
    /// it as `COMPLETED` or reschedule the remainder as `WAITING`.
    pub async fn run(&self) {
        loop {
            let job = match self.queue.retrieve(self.config.idle, &self.cancel).await {
                Ok(job) => job,
                Err(_) => break,
            };

            if let Err(error) = self.process(job).await {
                self.sink.log(
                    Level::Error,
                    &format!("dispatcher failed to process a job: {error}"),
                );
            }

            if self.cancel.is_cancelled() {
                break;
            }
        }
    }

    async fn process(&self, job: Arc<Job>) -> EngineResult<()> {
        if job.status() != JobStatus::Selected {
            self.state
                .update_status(&job, JobStatus::Selected, SOURCE, "picked for dispatch")?;
        }

        self.state
            .update_status(&job, JobStatus::Running, SOURCE, "starting")?;
        self.queue.set_running(job.clone());
        self.metrics.on_start(job.name(), now());

        let slice = self.config.cpu_time_slice.unwrap_or(u64::MAX);
        let t = job.cpu_time().min(slice);
        self.cancel
            .sleep_or_cancelled(Duration::from_secs(t))
            .await;

        if self.cancel.is_cancelled() {
            self.queue.clear_running();
            self.state
                .update_status(&job, JobStatus::Interrupted, SOURCE, "cancelled mid-run")?;
            self.sink.log_job(
                Level::Info,
                &JobContext::from_job(&job),
                "interrupted by cooperative cancellation",
            );
            return Ok(());
        }

        self.queue.clear_running();
        if t >= job.cpu_time() {
            self.state
                .update_status(&job, JobStatus::Completed, SOURCE, "ran to completion")?;
            self.metrics.on_completion(job.name(), now());
        } else {
            self.state
                .update_status(&job, JobStatus::Waiting, SOURCE, "time slice exhausted")?;
            self.queue.reschedule(job, SOURCE)?;
        }

        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csubatch_core::NullEventSink;
    use std::time::Duration as StdDuration;

    fn harness(config: DispatcherConfig) -> (Arc<QueueManager>, Arc<JobStateManager>, Dispatcher) {
        let state = Arc::new(JobStateManager::new(Arc::new(NullEventSink)));
        let queue = Arc::new(QueueManager::new(state.clone()));
        let metrics = Arc::new(MetricsRecorder::new(0));
        let dispatcher = Dispatcher::new(
            queue.clone(),
            state.clone(),
            metrics,
            Arc::new(NullEventSink),
            config,
        );
        (queue, state, dispatcher)
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_e_time_slice_reschedules_the_remainder() {
        let (queue, _state, dispatcher) = harness(DispatcherConfig {
            cpu_time_slice: Some(2),
            idle: StdDuration::from_millis(1),
        });

        let job = Arc::new(Job::new("long", 5, 0, 0));
        queue.add(job.clone(), "Submitter").unwrap();

        let handle = tokio::spawn(async move { dispatcher.run_once_for_test().await });
        tokio::time::advance(StdDuration::from_secs(3)).await;
        handle.await.unwrap();

        assert_eq!(job.status(), JobStatus::Waiting);
        assert_eq!(queue.size(), 1);
        assert!(queue.get_running().is_none());
    }

    #[tokio::test]
    async fn scenario_f_cancellation_mid_run_interrupts_the_job() {
        let (queue, _state, dispatcher) = harness(DispatcherConfig {
            cpu_time_slice: None,
            idle: StdDuration::from_millis(1),
        });

        let job = Arc::new(Job::new("forever", 3600, 0, 0));
        queue.add(job.clone(), "Submitter").unwrap();

        let dispatcher = Arc::new(dispatcher);
        let runner = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.run().await })
        };

        tokio::time::sleep(StdDuration::from_millis(20)).await;
        assert_eq!(queue.get_running().unwrap().name(), "forever");

        dispatcher.stop();
        tokio::time::timeout(StdDuration::from_secs(1), runner)
            .await
            .expect("dispatcher should exit promptly after stop")
            .unwrap();

        assert_eq!(job.status(), JobStatus::Interrupted);
        assert!(queue.get_running().is_none());
    }

    #[tokio::test]
    async fn a_full_job_completes_and_updates_metrics() {
        let state = Arc::new(JobStateManager::new(Arc::new(NullEventSink)));
        let queue = Arc::new(QueueManager::new(state.clone()));
        let metrics = Arc::new(MetricsRecorder::new(0));
        let dispatcher = Dispatcher::new(
            queue.clone(),
            state,
            metrics.clone(),
            Arc::new(NullEventSink),
            DispatcherConfig {
                cpu_time_slice: None,
                idle: StdDuration::from_millis(1),
            },
        );

        let job = Arc::new(Job::new("quick", 0, 0, 0));
        queue.add(job.clone(), "Submitter").unwrap();

        dispatcher.process(job.clone()).await.unwrap();

        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(metrics.total_completed(), 1);
    }

    impl Dispatcher {
        /// Test-only helper: process exactly one job then return, instead
        /// of looping until `stop()`.
        async fn run_once_for_test(&self) {
            if let Ok(job) = self.queue.retrieve(self.config.idle, &self.cancel).await {
                let _ = self.process(job).await;
            }
        }
    }
}
