//! Time source for deadline checks.
//!
//! The router compares every request deadline against a [`Clock`].
//! [`SystemClock`] reads wall-clock seconds; [`ManualClock`] is set by
//! hand so deadline behaviour can be tested deterministically.

use core::sync::atomic::{AtomicU64, Ordering};

/// A source of the current time in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Current timestamp in seconds.
    #[must_use]
    fn now(&self) -> u64;
}

/// Wall-clock time via [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch clocks read as zero.
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use hydra_exchange::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_700_000_000);
/// clock.advance(60);
/// assert_eq!(clock.now(), 1_700_000_060);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading `now`.
    #[must_use]
    pub const fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Jumps to `now`.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Release);
    }

    /// Moves forward by `seconds`, saturating at `u64::MAX`.
    pub fn advance(&self, seconds: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                Some(t.saturating_add(seconds))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
