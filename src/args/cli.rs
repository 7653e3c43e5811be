use clap::Parser;
use std::time::Duration;

use super::defaults::{DEFAULT_ACCEPT_STATUS, DEFAULT_BACKOFF_JITTER_MS, DEFAULT_REQUESTS};
use super::parsers::{
    parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_status_code,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Fire a fixed number of synthetic swipe writes at a server through a bounded worker pool and report throughput and latency."
)]
pub struct TesterArgs {
    /// Base URL of the server under test
    #[arg(long = "url", short = 'u', env = "SERVER_URL")]
    pub url: Option<String>,

    /// Number of concurrent workers
    #[arg(
        long = "workers",
        short = 'w',
        alias = "concurrency",
        env = "SWIPELOAD_WORKERS",
        default_value = "10",
        value_parser = parse_positive_usize
    )]
    pub workers: PositiveUsize,

    /// Total number of requests to send
    #[arg(
        long = "requests",
        short = 'n',
        env = "SWIPELOAD_REQUESTS",
        default_value_t = DEFAULT_REQUESTS
    )]
    pub requests: u64,

    /// Maximum attempts per request (first try included)
    #[arg(
        long = "max-retries",
        default_value = "5",
        value_parser = parse_positive_u64
    )]
    pub max_retries: PositiveU64,

    /// Per-attempt deadline (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "32s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Base delay of the exponential backoff (supports ms/s/m/h)
    #[arg(
        long = "backoff-base",
        default_value = "100ms",
        value_parser = parse_duration_arg
    )]
    pub backoff_base: Duration,

    /// Upper bound (exclusive) of the random jitter added to each backoff, in milliseconds
    #[arg(long = "backoff-jitter-ms", default_value_t = DEFAULT_BACKOFF_JITTER_MS)]
    pub backoff_jitter_ms: u64,

    /// Clamp the exponential part of the backoff to this duration
    #[arg(long = "backoff-cap", value_parser = parse_duration_arg)]
    pub backoff_cap: Option<Duration>,

    /// Status codes counted as success (comma separated)
    #[arg(
        long = "accept-status",
        value_delimiter = ',',
        default_values_t = DEFAULT_ACCEPT_STATUS,
        value_parser = parse_status_code
    )]
    pub accept_status: Vec<u16>,

    /// Seed for the per-worker random sources (entropy when omitted)
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Serve GET /dummy -> 204 on this port while the run is in progress
    #[arg(long = "health-port", env = "CLIENT_PORT")]
    pub health_port: Option<u16>,

    /// Write one CSV row per completed request
    #[arg(long = "export-csv")]
    pub export_csv: Option<String>,

    /// Write per-second throughput as CSV
    #[arg(long = "export-throughput-csv")]
    pub export_throughput_csv: Option<String>,

    /// Write the summary and all samples as JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Path to a TOML or JSON config file
    #[arg(long = "config", short = 'c')]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl TesterArgs {
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        u32::try_from(self.max_retries.get()).unwrap_or(u32::MAX)
    }
}
