use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::args::TesterArgs;
use crate::error::AppResult;
use crate::metrics::{Counters, LatencySample, RunReport, aggregate};

use super::backoff::BackoffPolicy;
use super::executor::RequestExecutor;
use super::ports::{PayloadGenerator, Transport};
use super::retry::RetryPolicy;
use super::task_source::{TaskSource, TokenSource};
use super::worker::{WorkerContext, WorkerReport, run_worker};

/// Shape of one run. Every entry point only differs in these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    pub workers: usize,
    pub requests: u64,
    pub retry: RetryPolicy,
    pub deadline: Duration,
    pub accepted_statuses: Vec<u16>,
    pub seed: Option<u64>,
}

impl LoadPlan {
    #[must_use]
    pub fn from_args(args: &TesterArgs) -> Self {
        let backoff =
            BackoffPolicy::new(args.backoff_base, args.backoff_jitter_ms, args.backoff_cap);
        Self {
            workers: args.workers.get(),
            requests: args.requests,
            retry: RetryPolicy::new(args.max_attempts(), backoff),
            deadline: args.request_timeout,
            accepted_statuses: args.accept_status.clone(),
            seed: args.seed,
        }
    }
}

/// Spawns the worker pool, waits for all of it, and aggregates the results.
pub struct Coordinator<G, T: ?Sized> {
    plan: LoadPlan,
    generator: Arc<G>,
    transport: Arc<T>,
}

impl<G, T> Coordinator<G, T>
where
    G: PayloadGenerator + 'static,
    G::Payload: 'static,
    T: Transport<G::Payload> + ?Sized + 'static,
{
    pub const fn new(plan: LoadPlan, generator: Arc<G>, transport: Arc<T>) -> Self {
        Self {
            plan,
            generator,
            transport,
        }
    }

    /// Runs `plan.requests` tokens through `plan.workers` workers.
    ///
    /// # Errors
    ///
    /// Returns an error only if a worker task panicked. Request failures are
    /// counted in the report instead.
    pub async fn run(&self) -> AppResult<RunReport> {
        let source = Arc::new(TaskSource::populate(self.plan.requests));
        self.run_with_source(source).await
    }

    /// Same as [`Coordinator::run`] with a caller-provided token source.
    ///
    /// # Errors
    ///
    /// Returns an error only if a worker task panicked.
    pub async fn run_with_source<S>(&self, source: Arc<S>) -> AppResult<RunReport>
    where
        S: TokenSource + ?Sized + 'static,
    {
        let executor = RequestExecutor::new(
            Arc::clone(&self.transport),
            self.plan.deadline,
            &self.plan.accepted_statuses,
        );
        let workers = self.plan.workers.max(1);

        info!(
            "Starting {} requests with {} workers...",
            self.plan.requests, workers
        );
        let run_start = Instant::now();

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let context = WorkerContext {
                worker_id,
                source: Arc::clone(&source),
                generator: Arc::clone(&self.generator),
                executor: executor.clone(),
                retry: self.plan.retry,
                run_start,
            };
            let rng = worker_rng(self.plan.seed, worker_id);
            handles.push(tokio::spawn(run_worker(context, rng)));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            reports.push(handle.await?);
        }
        let elapsed = run_start.elapsed();
        debug!("All {} workers joined after {:?}", reports.len(), elapsed);

        Ok(reduce(reports, elapsed))
    }
}

/// Golden-ratio multiplier for per-worker seeds.
const WORKER_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Worker `i` of a seeded run gets `seed ^ (i * WORKER_SEED_MIX)`.
pub(super) fn worker_rng(seed: Option<u64>, worker_id: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let index = u64::try_from(worker_id).unwrap_or(u64::MAX);
            StdRng::seed_from_u64(seed ^ index.wrapping_mul(WORKER_SEED_MIX))
        }
        None => StdRng::from_entropy(),
    }
}

/// Single-threaded merge after the join barrier.
fn reduce(reports: Vec<WorkerReport>, elapsed: Duration) -> RunReport {
    for report in &reports {
        debug!(
            worker_id = report.worker_id,
            success = report.counters.success,
            errors = report.counters.errors,
            attempts = report.attempts,
            "worker finished"
        );
    }
    let counters = Counters::merge(reports.iter().map(|report| report.counters));
    let attempts = reports
        .iter()
        .fold(0u64, |sum, report| sum.saturating_add(report.attempts));
    let per_worker: Vec<Vec<LatencySample>> =
        reports.into_iter().map(|report| report.samples).collect();

    let summary = aggregate(&per_worker, counters, attempts, elapsed);
    let samples = per_worker.into_iter().flatten().collect();
    RunReport { summary, samples }
}
