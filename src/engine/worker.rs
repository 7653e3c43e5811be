use std::sync::Arc;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::RequestFailure;
use crate::metrics::{Counters, LatencySample};

use super::executor::RequestExecutor;
use super::ports::{PayloadGenerator, Transport};
use super::retry::{Resolution, Resolved, RetryPolicy};
use super::task_source::TokenSource;

/// Everything a worker produced, handed back through its join handle.
#[derive(Debug, Default)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub samples: Vec<LatencySample>,
    pub counters: Counters,
    pub attempts: u64,
}

impl WorkerReport {
    fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }

    fn record(&mut self, resolved: &Resolved, completed_at: std::time::Duration) {
        let success = resolved.resolution.is_success();
        self.counters.record(success);
        self.attempts = self.attempts.saturating_add(u64::from(resolved.attempts));
        self.samples.push(LatencySample {
            completed_at,
            latency: resolved.latency,
            success,
            attempts: resolved.attempts,
        });
    }
}

pub(super) struct WorkerContext<S: ?Sized, G, T: ?Sized> {
    pub(super) worker_id: usize,
    pub(super) source: Arc<S>,
    pub(super) generator: Arc<G>,
    pub(super) executor: RequestExecutor<T>,
    pub(super) retry: RetryPolicy,
    pub(super) run_start: Instant,
}

/// Drains `source` one token at a time until it reports exhaustion.
pub(super) async fn run_worker<S, G, T, R>(
    context: WorkerContext<S, G, T>,
    mut rng: R,
) -> WorkerReport
where
    S: TokenSource + ?Sized,
    G: PayloadGenerator,
    T: Transport<G::Payload> + ?Sized,
    R: Rng,
{
    let WorkerContext {
        worker_id,
        source,
        generator,
        executor,
        retry,
        run_start,
    } = context;
    let mut report = WorkerReport::new(worker_id);

    while let Some(_token) = source.take() {
        let payload = generator.generate(&mut rng);
        let resolved = retry.drive(&executor, &payload, &mut rng).await;

        match &resolved.resolution {
            Resolution::Succeeded { status } => {
                debug!(worker_id, status, attempts = resolved.attempts, "request succeeded");
            }
            Resolution::ExhaustedFailure(RequestFailure::Rejected(failure)) => {
                warn!(worker_id, "{}", failure);
            }
            Resolution::ExhaustedFailure(failure @ RequestFailure::RetriesExhausted { .. }) => {
                error!(worker_id, "{}", failure);
            }
        }

        report.record(&resolved, run_start.elapsed());
    }

    debug!(
        worker_id,
        completed = report.samples.len(),
        "task source exhausted, worker exiting"
    );
    report
}
