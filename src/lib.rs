//! Core library for the `swipeload` CLI.
//!
//! The crate drains a fixed number of task tokens through a bounded pool of
//! workers, retries transport failures with exponential backoff and jitter,
//! and reduces per-worker samples into latency and throughput statistics. The
//! `engine` module is transport agnostic; `http` plugs in the swipe payload and
//! a `reqwest` client.
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod metrics;
