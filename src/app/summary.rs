use crate::metrics::{LatencyStats, Summary};

pub(crate) struct SummaryStats {
    pub(crate) success_rate_x100: u64,
    pub(crate) avg_rps_x100: u64,
}

pub(crate) fn compute_summary_stats(summary: &Summary) -> SummaryStats {
    let duration_ms = summary.duration.as_millis().max(1);
    let total = summary.total_requests;
    let success = summary.success_count;

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(success)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    let avg_rps_x100 = if success > 0 {
        let scaled = u128::from(success)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    SummaryStats {
        success_rate_x100,
        avg_rps_x100,
    }
}

pub(crate) fn print_summary(summary: &Summary) {
    let stats = compute_summary_stats(summary);

    println!("Duration: {:.3}s", summary.duration.as_secs_f64());
    println!("Total Requests: {}", summary.total_requests);
    println!(
        "Successful: {} ({}.{:02}%)",
        summary.success_count,
        stats.success_rate_x100 / 100,
        stats.success_rate_x100 % 100
    );
    println!("Errors: {}", summary.error_count);
    println!("Attempts: {}", summary.attempts);
    println!(
        "Throughput: {}.{:02} req/s",
        stats.avg_rps_x100 / 100,
        stats.avg_rps_x100 % 100
    );
    print_latency("all", summary.latency.as_ref());
    print_latency("ok", summary.success_latency.as_ref());
}

fn print_latency(label: &str, stats: Option<&LatencyStats>) {
    let Some(stats) = stats else {
        println!("Latency ({}): no data", label);
        return;
    };
    println!(
        "Mean/Median Latency ({}): {:.2}ms / {:.2}ms",
        label, stats.mean_ms, stats.median_ms
    );
    println!("P99 Latency ({}): {:.2}ms", label, stats.p99_ms);
    println!(
        "Min/Max Latency ({}): {:.2}ms / {:.2}ms",
        label, stats.min_ms, stats.max_ms
    );
}
