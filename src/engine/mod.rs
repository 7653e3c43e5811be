//! Work distribution, retry/backoff, and the worker pool.
//!
//! A [`Coordinator`] seals a [`TaskSource`] of `N` tokens, spawns a fixed
//! number of workers that drain it, and reduces their private results into a
//! [`RunReport`](crate::metrics::RunReport) once every worker has been joined.
mod backoff;
mod coordinator;
mod executor;
mod ports;
mod retry;
mod task_source;
mod worker;


pub use backoff::BackoffPolicy;
pub use coordinator::{Coordinator, LoadPlan};
pub use executor::{Outcome, RequestExecutor};
pub use ports::{Delivery, PayloadGenerator, Transport};
pub use retry::{AttemptRecord, Resolution, Resolved, RetryPolicy};
pub use task_source::{TaskSource, TaskToken, TokenSource};
pub use worker::WorkerReport;
