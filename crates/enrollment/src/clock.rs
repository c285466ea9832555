//! Time source.

use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Utc};
use eduquest_core::Time;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> Time;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Time>,
}

impl ManualClock {
    /// Clock frozen at `now`.
    pub fn new(now: Time) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Jump to `now`.
    pub fn set(&self, now: Time) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock() {
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 2, 1, 1, 0, 0).unwrap());

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
