//! Clock adapters.

use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock frozen at Unix epoch milliseconds; out-of-range values use the epoch.
    pub fn at_millis(millis: i64) -> Self {
        let now = Timestamp::from_unix_millis(millis)
            .or_else(|| Timestamp::from_unix_millis(0))
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now = now.plus_days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_only_when_advanced() {
        let clock = FixedClock::at_millis(1_700_000_000_000);
        let start = clock.now();
        assert_eq!(clock.now(), start);
        clock.advance_days(2);
        assert_eq!(clock.now(), start.plus_days(2));
    }
}
