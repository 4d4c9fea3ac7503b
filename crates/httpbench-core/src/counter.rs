//! Process-wide request accounting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic tally of handler invocations.
///
/// Every handler bumps the counter exactly once before it builds its body.
/// Increments are a single `fetch_add`; only atomicity matters, so the
/// ordering is `Relaxed`.
#[derive(Debug, Default)]
pub struct RequestCounter {
    total: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
        }
    }

    /// Count one request and return the total observed before it.
    pub fn increment(&self) -> u64 {
        self.total.fetch_add(1, Ordering::Relaxed)
    }

    /// Current total.
    pub fn get(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
