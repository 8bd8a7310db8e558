//! Time source for the engine
//!
//! Issuance windows, rating reveal windows, and rate-change cooldowns all
//! depend on the current time, so the engine reads it through a trait and
//! tests can drive it by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use colony_common::timestamp_secs;

/// Supplies the current time in seconds since the epoch
pub trait Clock: Send + Sync {
    /// The current time
    fn now(&self) -> u64;
}

/// The wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        timestamp_secs()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock stopped at `now`
    pub fn at(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `secs`
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
