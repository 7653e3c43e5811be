use std::time::Duration;

use super::types::{Counters, LatencySample, LatencyStats, Summary, ThroughputSample};

/// Reduces every worker's samples and the merged counters into a [`Summary`].
///
/// Statistics do not depend on sample order. Percentiles use the nearest-rank
/// method: P99 is the value at rank `ceil(0.99 * n)` of the sorted samples.
#[must_use]
pub fn aggregate(
    per_worker_samples: &[Vec<LatencySample>],
    counters: Counters,
    attempts: u64,
    elapsed: Duration,
) -> Summary {
    let mut all_ms = Vec::new();
    let mut success_ms = Vec::new();
    for sample in per_worker_samples.iter().flatten() {
        let ms = duration_ms(sample.latency);
        all_ms.push(ms);
        if sample.success {
            success_ms.push(ms);
        }
    }

    Summary {
        duration: elapsed,
        total_requests: counters.total(),
        success_count: counters.success,
        error_count: counters.errors,
        attempts,
        throughput_rps: throughput(counters.success, elapsed),
        latency: latency_stats(&mut all_ms),
        success_latency: latency_stats(&mut success_ms),
        timeline: throughput_timeline(per_worker_samples.iter().flatten(), elapsed),
    }
}

/// Sorts `values_ms` in place and summarizes it; `None` for an empty slice.
#[expect(
    clippy::float_arithmetic,
    reason = "latency statistics are reported as fractional milliseconds"
)]
pub fn latency_stats(values_ms: &mut [f64]) -> Option<LatencyStats> {
    values_ms.sort_by(f64::total_cmp);
    let count = values_ms.len();
    let min_ms = *values_ms.first()?;
    let max_ms = *values_ms.last()?;

    let sum: f64 = values_ms.iter().sum();
    let mean_ms = sum / count as f64;

    let mid = count / 2;
    let median_ms = if count % 2 == 0 {
        let lower = *values_ms.get(mid.saturating_sub(1))?;
        let upper = *values_ms.get(mid)?;
        (lower + upper) / 2.0
    } else {
        *values_ms.get(mid)?
    };

    let rank = count.saturating_mul(99).div_ceil(100);
    let p99_ms = *values_ms.get(rank.saturating_sub(1))?;

    Some(LatencyStats {
        count,
        mean_ms,
        median_ms,
        p99_ms,
        min_ms,
        max_ms,
    })
}

/// Successful completions bucketed per second, zero-filled across the run.
pub fn throughput_timeline<'sample, I>(samples: I, elapsed: Duration) -> Vec<ThroughputSample>
where
    I: IntoIterator<Item = &'sample LatencySample>,
{
    let mut buckets: Vec<u64> = vec![0; usize::try_from(seconds_covering(elapsed)).unwrap_or(0)];
    for sample in samples.into_iter().filter(|sample| sample.success) {
        let index = usize::try_from(sample.completed_at.as_secs()).unwrap_or(usize::MAX);
        if index >= buckets.len() {
            buckets.resize(index.saturating_add(1), 0);
        }
        if let Some(bucket) = buckets.get_mut(index) {
            *bucket = bucket.saturating_add(1);
        }
    }

    buckets
        .into_iter()
        .zip(1u64..)
        .map(|(requests, second)| ThroughputSample { second, requests })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "throughput is a rate over fractional seconds"
)]
fn throughput(success: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        success as f64 / secs
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "sub-millisecond precision is kept for the statistics"
)]
fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn seconds_covering(elapsed: Duration) -> u64 {
    let whole = elapsed.as_secs();
    if elapsed.subsec_nanos() > 0 {
        whole.saturating_add(1)
    } else {
        whole
    }
}
