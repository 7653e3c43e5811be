use std::time::Duration;

/// One completed task token, recorded by the worker that ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySample {
    /// Offset from the start of the run at which the token resolved.
    pub completed_at: Duration,
    /// End to end, backoff waits included.
    pub latency: Duration,
    pub success: bool,
    pub attempts: u32,
}

/// Worker-local outcome counters, summed once after the join.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub success: u64,
    pub errors: u64,
}

impl Counters {
    pub const fn record(&mut self, success: bool) {
        if success {
            self.success = self.success.saturating_add(1);
        } else {
            self.errors = self.errors.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.success.saturating_add(self.errors)
    }

    pub fn merge<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Counters>,
    {
        parts.into_iter().fold(Self::default(), |acc, part| Self {
            success: acc.success.saturating_add(part.success),
            errors: acc.errors.saturating_add(part.errors),
        })
    }
}

/// Order statistics over a set of latencies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub count: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Successful completions during the `second`-th second of the run (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputSample {
    pub second: u64,
    pub requests: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub duration: Duration,
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub attempts: u64,
    /// Successful requests per second over the whole run.
    pub throughput_rps: f64,
    /// All resolved tokens. `None` when nothing was recorded.
    pub latency: Option<LatencyStats>,
    /// Successful tokens only. `None` when nothing succeeded.
    pub success_latency: Option<LatencyStats>,
    pub timeline: Vec<ThroughputSample>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: Summary,
    pub samples: Vec<LatencySample>,
}
