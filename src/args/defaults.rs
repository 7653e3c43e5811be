pub(crate) const DEFAULT_USER_AGENT: &str = concat!("swipeload/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_REQUESTS: u64 = 100_000;
pub(crate) const DEFAULT_BACKOFF_JITTER_MS: u64 = 1000;
pub(crate) const DEFAULT_ACCEPT_STATUS: [u16; 2] = [200, 201];
