use std::sync::atomic::{AtomicU64, Ordering};

/// One unit of work. Carries nothing; it only exists to be consumed once.
#[derive(Debug)]
pub struct TaskToken {
    _private: (),
}

/// Anything workers can pull tokens from. `None` means exhausted.
pub trait TokenSource: Send + Sync {
    fn take(&self) -> Option<TaskToken>;
}

/// A sealed pool of exactly `total` tokens.
///
/// There is no way to add tokens after [`TaskSource::populate`]; the pool only
/// ever drains. `take` is a lock-free countdown, so every token goes to exactly
/// one caller regardless of how many workers race on it.
#[derive(Debug)]
pub struct TaskSource {
    total: u64,
    taken: AtomicU64,
}

impl TaskSource {
    #[must_use]
    pub const fn populate(total: u64) -> Self {
        Self {
            total,
            taken: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.taken.load(Ordering::Acquire))
    }
}

impl TokenSource for TaskSource {
    fn take(&self) -> Option<TaskToken> {
        loop {
            let current = self.taken.load(Ordering::Acquire);
            if current >= self.total {
                return None;
            }
            let next = current.checked_add(1)?;
            if self
                .taken
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(TaskToken { _private: () });
            }
        }
    }
}
