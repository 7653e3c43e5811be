use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration_value;
use crate::error::ValidationError;

/// Mirror of the CLI options; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "server_url")]
    pub url: Option<String>,
    #[serde(alias = "concurrency")]
    pub workers: Option<usize>,
    pub requests: Option<u64>,
    pub max_retries: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub backoff_base: Option<DurationValue>,
    pub backoff_jitter_ms: Option<u64>,
    pub backoff_cap: Option<DurationValue>,
    pub accept_status: Option<Vec<u16>>,
    pub seed: Option<u64>,
    pub health_port: Option<u16>,
    pub export_csv: Option<String>,
    pub export_throughput_csv: Option<String>,
    pub export_json: Option<String>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
