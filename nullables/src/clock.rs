//! Nullable clock: deterministic timestamps for testing.

use std::sync::atomic::{AtomicU64, Ordering};

use upvote_types::Timestamp;

/// A clock that only moves when told to.
///
/// [`NullClock::tick`] hands out strictly increasing timestamps, which is
/// what most entry-ordering tests need.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    /// Advance by one second and return the new time.
    pub fn tick(&self) -> Timestamp {
        Timestamp::new(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}
