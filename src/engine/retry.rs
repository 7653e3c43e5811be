use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::error::RequestFailure;

use super::backoff::BackoffPolicy;
use super::executor::{Outcome, RequestExecutor};
use super::ports::Transport;

/// Where a token's retry loop ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Succeeded { status: u16 },
    ExhaustedFailure(RequestFailure),
}

impl Resolution {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Resolution::Succeeded { .. })
    }
}

/// Terminal state plus what it cost to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub resolution: Resolution,
    pub attempts: u32,
    /// From the start of the first attempt to the terminal state, backoff included.
    pub latency: Duration,
}

/// One attempt as seen by the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub index: u32,
    pub waited: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffPolicy,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; zero is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: BackoffPolicy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Runs attempts until one succeeds, one is rejected, or the budget is spent.
    ///
    /// Only transport failures are retried. A response outside the accepted
    /// status set ends the loop immediately.
    pub async fn drive<P, T, R>(
        &self,
        executor: &RequestExecutor<T>,
        payload: &P,
        rng: &mut R,
    ) -> Resolved
    where
        P: Sync,
        T: Transport<P> + ?Sized,
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let mut record = AttemptRecord {
            index: 1,
            waited: Duration::ZERO,
        };

        loop {
            trace!(attempt = record.index, waited = ?record.waited, "sending");
            let resolution = match executor.execute(payload).await {
                Outcome::Success { status } => Resolution::Succeeded { status },
                Outcome::TerminalFailure(failure) => {
                    Resolution::ExhaustedFailure(RequestFailure::Rejected(failure))
                }
                Outcome::TransientFailure(err) => {
                    if record.index >= self.max_attempts {
                        Resolution::ExhaustedFailure(RequestFailure::RetriesExhausted {
                            attempts: record.index,
                            last: err,
                        })
                    } else {
                        let wait = self.backoff.delay(record.index, rng);
                        debug!(
                            attempt = record.index,
                            error = %err,
                            "sleeping for {:?}",
                            wait
                        );
                        sleep(wait).await;
                        record = AttemptRecord {
                            index: record.index.saturating_add(1),
                            waited: wait,
                        };
                        continue;
                    }
                }
            };

            return Resolved {
                resolution,
                attempts: record.index,
                latency: started.elapsed(),
            };
        }
    }
}
