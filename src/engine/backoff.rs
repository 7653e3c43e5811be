use std::time::Duration;

use rand::Rng;

/// Exponential backoff with additive jitter.
///
/// `delay(n) = min(base * 2^n, cap) + uniform[0, jitter_ceiling_ms) ms`.
/// The policy holds no mutable state; randomness comes from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    jitter_ceiling_ms: u64,
    cap: Option<Duration>,
}

impl BackoffPolicy {
    #[must_use]
    pub const fn new(base: Duration, jitter_ceiling_ms: u64, cap: Option<Duration>) -> Self {
        Self {
            base,
            jitter_ceiling_ms,
            cap,
        }
    }

    /// Deterministic part of the delay, saturating instead of overflowing.
    #[must_use]
    pub fn exponential(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let raw = self.base.checked_mul(factor).unwrap_or(Duration::MAX);
        match self.cap {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter_ceiling_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.gen_range(0..self.jitter_ceiling_ms))
    }

    pub fn delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        self.exponential(attempt).saturating_add(self.jitter(rng))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 1000, None)
    }
}
