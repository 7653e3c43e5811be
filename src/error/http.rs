use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL '{url}' must use http or https.")]
    UnsupportedScheme { url: String },
    #[error("URL '{url}' is missing a host.")]
    MissingHost { url: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to bind health listener on {addr}: {source}")]
    BindHealthListener {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
