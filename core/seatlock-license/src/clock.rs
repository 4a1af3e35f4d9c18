//! License clock.
//!
//! A license is a fixed budget of seconds that starts draining the moment
//! the account is activated. Remaining time is always derived, never stored:
//! `remaining = max(0, duration - (now - activated_at))`.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

/// Computes the whole seconds left on a license.
///
/// Fractional seconds are truncated, so a license with 999ms left reports 0
/// and is expired. An activation time later than `now` counts as no time
/// elapsed.
#[must_use]
pub fn remaining(duration_secs: u64, activated_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let elapsed_ms = now
        .signed_duration_since(activated_at)
        .num_milliseconds()
        .max(0);
    let budget_ms = i64::try_from(duration_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    let left_ms = budget_ms.saturating_sub(elapsed_ms);
    if left_ms <= 0 {
        0
    } else {
        (left_ms / 1000) as u64
    }
}

/// A license is expired iff it has no whole seconds left.
#[must_use]
pub fn is_expired(remaining_secs: u64) -> bool {
    remaining_secs == 0
}

/// Source of "now" for everything that reads the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used for deterministic scenarios.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward (or backward, for negative values).
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
