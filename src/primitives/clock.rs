//! Time source.
//!
//! The gate never reads the system clock directly; it asks a `Clock`. Times are
//! whole seconds. The source is treated as monotonic but untrusted, so every
//! comparison against it is a plain `<` / `<=` with no tolerance window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Current-time provider.
pub trait Clock {
    /// Current time in seconds.
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Wall-clock seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Externally driven clock for hosts that supply their own notion of time
/// (block timestamps, simulations).
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self { now: AtomicU64::new(start) }
    }

    /// Moves the clock forward. Never moves it backwards.
    pub fn set(&self, time: u64) {
        self.now.fetch_max(time, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        // The closure always yields a value, so the update cannot fail.
        let _ = self.now.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
            Some(t.saturating_add(seconds))
        });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::new(100);
        clock.advance(5);
        assert_eq!(clock.now(), 105);
        clock.set(50);
        assert_eq!(clock.now(), 105);
        clock.set(200);
        assert_eq!(clock.now(), 200);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::new(1));
        let view = Arc::clone(&clock);
        clock.advance(9);
        assert_eq!(view.now(), 10);
    }

    #[test]
    fn test_concurrent_advances_all_land() {
        let clock = Arc::new(ManualClock::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        clock.advance(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clock.now(), 8_000);
    }

    #[test]
    fn test_advance_saturates() {
        let clock = ManualClock::new(u64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now(), u64::MAX);
    }

    #[test]
    fn test_system_clock_is_past_epoch() {
        assert!(SystemClock.now() > 1_600_000_000);
    }
}
