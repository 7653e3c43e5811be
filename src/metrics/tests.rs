use super::*;
use std::time::Duration;

const EPSILON: f64 = 1e-9;

#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}

fn sample(completed_ms: u64, latency_ms: u64, success: bool) -> LatencySample {
    LatencySample {
        completed_at: Duration::from_millis(completed_ms),
        latency: Duration::from_millis(latency_ms),
        success,
        attempts: 1,
    }
}

#[test]
fn latency_stats_even_count() -> Result<(), String> {
    let mut values = vec![40.0, 10.0, 30.0, 20.0];
    let stats = latency_stats(&mut values).ok_or("expected stats")?;

    if stats.count != 4 {
        return Err(format!("count was {}", stats.count));
    }
    if !approx_eq(stats.mean_ms, 25.0) || !approx_eq(stats.median_ms, 25.0) {
        return Err(format!("mean/median wrong: {:?}", stats));
    }
    if !approx_eq(stats.min_ms, 10.0) || !approx_eq(stats.max_ms, 40.0) {
        return Err(format!("min/max wrong: {:?}", stats));
    }
    if !approx_eq(stats.p99_ms, 40.0) {
        return Err(format!("p99 wrong: {:?}", stats));
    }
    Ok(())
}

#[test]
fn latency_stats_odd_count_takes_middle() -> Result<(), String> {
    let mut values = vec![5.0, 1.0, 3.0];
    let stats = latency_stats(&mut values).ok_or("expected stats")?;
    if !approx_eq(stats.median_ms, 3.0) {
        return Err(format!("median was {}", stats.median_ms));
    }
    Ok(())
}

#[test]
fn latency_stats_empty_is_none() -> Result<(), String> {
    let mut values: Vec<f64> = Vec::new();
    match latency_stats(&mut values) {
        None => Ok(()),
        Some(stats) => Err(format!("expected no data, got {:?}", stats)),
    }
}

#[test]
fn p99_uses_nearest_rank() -> Result<(), String> {
    let mut values: Vec<f64> = (1..=200).map(f64::from).collect();
    let stats = latency_stats(&mut values).ok_or("expected stats")?;
    // rank ceil(0.99 * 200) = 198
    if !approx_eq(stats.p99_ms, 198.0) {
        return Err(format!("p99 was {}", stats.p99_ms));
    }

    let mut small = vec![7.0, 3.0];
    let small_stats = latency_stats(&mut small).ok_or("expected stats")?;
    if !approx_eq(small_stats.p99_ms, 7.0) {
        return Err(format!("p99 of two was {}", small_stats.p99_ms));
    }
    Ok(())
}

#[test]
fn counters_merge_sums_parts() -> Result<(), String> {
    let mut first = Counters::default();
    first.record(true);
    first.record(false);
    let mut second = Counters::default();
    second.record(true);
    second.record(true);

    let merged = Counters::merge([first, second]);
    if merged.success != 3 || merged.errors != 1 || merged.total() != 4 {
        return Err(format!("unexpected merge: {:?}", merged));
    }
    Ok(())
}

#[test]
fn timeline_zero_fills_quiet_seconds() -> Result<(), String> {
    let samples = [
        sample(100, 10, true),
        sample(200, 10, true),
        sample(2_500, 10, true),
        sample(2_600, 10, false),
    ];
    let timeline = throughput_timeline(samples.iter(), Duration::from_millis(2_700));

    let expected = vec![
        ThroughputSample {
            second: 1,
            requests: 2,
        },
        ThroughputSample {
            second: 2,
            requests: 0,
        },
        ThroughputSample {
            second: 3,
            requests: 1,
        },
    ];
    if timeline != expected {
        return Err(format!("unexpected timeline: {:?}", timeline));
    }
    Ok(())
}

#[test]
fn aggregate_splits_success_latency() -> Result<(), String> {
    let per_worker = vec![
        vec![sample(10, 10, true), sample(20, 100, false)],
        vec![sample(30, 30, true)],
    ];
    let mut counters = Counters::default();
    for success in [true, false, true] {
        counters.record(success);
    }

    let summary = aggregate(&per_worker, counters, 7, Duration::from_secs(2));

    if summary.total_requests != 3 || summary.success_count != 2 || summary.error_count != 1 {
        return Err(format!("unexpected counts: {:?}", summary));
    }
    if summary.attempts != 7 {
        return Err(format!("attempts was {}", summary.attempts));
    }
    if !approx_eq(summary.throughput_rps, 1.0) {
        return Err(format!("throughput was {}", summary.throughput_rps));
    }
    let all = summary.latency.ok_or("missing latency")?;
    let ok = summary.success_latency.ok_or("missing success latency")?;
    if all.count != 3 || !approx_eq(all.max_ms, 100.0) {
        return Err(format!("unexpected all-latency: {:?}", all));
    }
    if ok.count != 2 || !approx_eq(ok.max_ms, 30.0) {
        return Err(format!("unexpected success latency: {:?}", ok));
    }
    Ok(())
}

#[test]
fn aggregate_with_nothing_recorded() -> Result<(), String> {
    let summary = aggregate(&[], Counters::default(), 0, Duration::ZERO);
    if summary.total_requests != 0 || summary.latency.is_some() {
        return Err(format!("expected an empty summary: {:?}", summary));
    }
    if !approx_eq(summary.throughput_rps, 0.0) || !summary.timeline.is_empty() {
        return Err(format!("expected zero throughput: {:?}", summary));
    }
    Ok(())
}
