//! Latency samples, counters, and their reduction into a run summary.
mod aggregate;
mod types;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, latency_stats, throughput_timeline};
pub use types::{Counters, LatencySample, LatencyStats, RunReport, Summary, ThroughputSample};
