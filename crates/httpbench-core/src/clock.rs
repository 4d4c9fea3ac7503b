//! Wall clock for payload timestamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Epoch-millisecond clock that never goes backwards within a process.
///
/// `SystemTime` may step back (NTP, manual changes); readings are clamped to
/// the highest value handed out so far.
#[derive(Debug, Default)]
pub struct WallClock {
    last: AtomicU64,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch millis, clamped to be non-decreasing.
    pub fn now_millis(&self) -> u64 {
        self.observe(system_millis())
    }

    fn observe(&self, raw: u64) -> u64 {
        let prev = self.last.fetch_max(raw, Ordering::Relaxed);
        prev.max(raw)
    }
}

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_backward_steps() {
        let clock = WallClock::new();
        assert_eq!(clock.observe(1_000), 1_000);
        assert_eq!(clock.observe(900), 1_000);
        assert_eq!(clock.observe(1_200), 1_200);
    }

    #[test]
    fn reads_real_time() {
        let clock = WallClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        // 2020-01-01T00:00:00Z
        assert!(a > 1_577_836_800_000);
        assert!(b >= a);
    }
}
