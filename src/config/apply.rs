use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, TesterArgs, ensure_status_code};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line or through an environment variable win
/// over the file.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_explicit(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = PositiveUsize::try_from(workers).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "workers",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_explicit(matches, "max_retries")
        && let Some(max_retries) = config.max_retries
    {
        args.max_retries = PositiveU64::try_from(max_retries).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "max_retries",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = to_duration(timeout, "timeout")?;
    }

    if !is_explicit(matches, "backoff_base")
        && let Some(base) = config.backoff_base.as_ref()
    {
        args.backoff_base = to_duration(base, "backoff_base")?;
    }

    if !is_explicit(matches, "backoff_jitter_ms")
        && let Some(jitter) = config.backoff_jitter_ms
    {
        args.backoff_jitter_ms = jitter;
    }

    if !is_explicit(matches, "backoff_cap")
        && let Some(cap) = config.backoff_cap.as_ref()
    {
        args.backoff_cap = Some(to_duration(cap, "backoff_cap")?);
    }

    if !is_explicit(matches, "accept_status")
        && let Some(statuses) = config.accept_status.as_ref()
    {
        if statuses.is_empty() {
            return Err(AppError::config(ConfigError::AcceptStatusEmpty));
        }
        let mut parsed = Vec::with_capacity(statuses.len());
        for status in statuses {
            parsed.push(ensure_status_code(*status)?);
        }
        args.accept_status = parsed;
    }

    if !is_explicit(matches, "seed") && config.seed.is_some() {
        args.seed = config.seed;
    }

    if !is_explicit(matches, "health_port") && config.health_port.is_some() {
        args.health_port = config.health_port;
    }

    if !is_explicit(matches, "export_csv") && config.export_csv.is_some() {
        args.export_csv.clone_from(&config.export_csv);
    }

    if !is_explicit(matches, "export_throughput_csv") && config.export_throughput_csv.is_some() {
        args.export_throughput_csv
            .clone_from(&config.export_throughput_csv);
    }

    if !is_explicit(matches, "export_json") && config.export_json.is_some() {
        args.export_json.clone_from(&config.export_json);
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration { field, source: err })
    })
}
