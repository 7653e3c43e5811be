use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to write {context} '{}': {source}", .path.display())]
    Export {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode JSON report: {source}")]
    EncodeJson {
        #[source]
        source: serde_json::Error,
    },
}
