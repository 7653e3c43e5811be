use std::time::Duration;

use thiserror::Error;

/// Failure to obtain any HTTP response. Always eligible for retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("deadline of {deadline:?} exceeded")]
    Timeout { deadline: Duration },
    #[error("connection failed: {message}")]
    Connect { message: String },
    #[error("request failed: {message}")]
    Request { message: String },
}

/// A response arrived but was not accepted. Never retried.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AttemptFailure {
    #[error("unexpected status {status}")]
    NonSuccessStatus { status: u16 },
}

/// Terminal failure of a task token, counted once as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestFailure {
    #[error("max retries hit after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: TransportError,
    },
    #[error("rejected: {0}")]
    Rejected(#[from] AttemptFailure),
}
