//! A one-shot demonstration of the CSUbatch engine: submits a fixed batch
//! of jobs, runs them to completion under a chosen policy, and prints the
//! final job listing and aggregate metrics.
//!
//! This is a demo harness, not the interactive batch-submission shell —
//! that remains an external collaborator this workspace doesn't build.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use csubatch_engine::{Engine, EngineConfig, Policy};

/// Runs a small fixed batch of jobs through the CSUbatch engine and prints
/// the resulting schedule and metrics.
#[derive(Parser, Debug)]
#[command(name = "csubatch-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ordering policy applied to the demo batch.
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Fcfs)]
    policy: PolicyArg,

    /// Caps each job's single run to this many simulated seconds before
    /// it's rescheduled. Omit for no time-slicing.
    #[arg(short = 's', long)]
    cpu_time_slice: Option<u64>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolicyArg {
    /// First-come, first-served.
    Fcfs,
    /// Shortest job first.
    Sjf,
    /// Smallest priority value first.
    Priority,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fcfs => Policy::Fcfs,
            PolicyArg::Sjf => Policy::Sjf,
            PolicyArg::Priority => Policy::Priority,
        }
    }
}

/// `(name, cpu_time, priority)` for the demo batch.
const DEMO_JOBS: &[(&str, i64, i64)] = &[
    ("compile", 3, 2),
    ("lint", 1, 1),
    ("package", 5, 3),
    ("smoke-test", 2, 0),
];

#[tokio::main]
async fn main() -> Result<()> {
    csubatch_infra_init();

    let args = Args::parse();
    let config = EngineConfig {
        initial_policy: args.policy.into(),
        cpu_time_slice: args.cpu_time_slice,
        scheduler_tick_ms: 50,
        dispatcher_idle_ms: 20,
    };

    let engine = Engine::with_defaults(config);

    for (name, cpu_time, priority) in DEMO_JOBS {
        let job = engine
            .submit(*name, *cpu_time, *priority)
            .with_context(|| format!("submitting demo job '{name}'"))?;
        tracing::info!(job = %job.name(), "submitted");
    }

    wait_for_all_to_finish(&engine).await;

    println!("Final schedule:");
    for job in engine.list() {
        println!("  {:<12} {:?}", job.name(), job.status());
    }

    let metrics = engine.metrics();
    println!("\nMetrics:");
    println!("  completed:       {}", metrics.total_completed());
    println!("  avg turnaround:  {:.2}s", metrics.avg_turnaround() / 1000.0);
    println!("  avg waiting:     {:.2}s", metrics.avg_waiting() / 1000.0);

    engine.shutdown().await;
    Ok(())
}

async fn wait_for_all_to_finish(engine: &Engine) {
    let timeout = Duration::from_secs(30);
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        let all_done = engine
            .list()
            .iter()
            .all(|job| job.status().is_terminal());
        if all_done {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    tracing::warn!("demo batch did not finish within the timeout");
}

fn csubatch_infra_init() {
    csubatch_engine::init_logging("info");
}
