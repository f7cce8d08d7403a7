/*!
 # Clock sources

 Wall-clock time for the scheduler. `SystemClock` reads the local system
 time; `ManualClock` is a settable clock for tests, demos and simulation.

 Clock-source contract: successive readings are monotonically
 non-decreasing. A clock that has no valid reading yet (for example a
 real-time clock that has not synchronized) returns `None` and the tick is
 skipped.
*/

use chrono::{Duration, Local, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of local wall-clock time with date, weekday and second resolution
pub trait Clock: Send + Sync {
    /// Current local time, or `None` if the clock has no valid reading yet
    fn now(&self) -> Option<NaiveDateTime>;
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Option<NaiveDateTime> {
        Some(Local::now().naive_local())
    }
}

/// Manually driven clock for tests and simulation
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Option<NaiveDateTime>>>,
}

impl ManualClock {
    /// Creates a clock with no valid reading yet
    pub fn unset() -> Self {
        Self::default()
    }

    /// Creates a clock reading `start`
    pub fn starting_at(start: NaiveDateTime) -> Self {
        let clock = Self::unset();
        clock.set(start);
        clock
    }

    /// Moves the clock to `now`
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = Some(now);
    }

    /// Advances the clock by `step`; a clock without a reading stays unset
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock();
        if let Some(current) = *now {
            *now = Some(current + step);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Option<NaiveDateTime> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn system_clock_always_has_a_reading() {
        assert!(SystemClock.now().is_some());
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::starting_at(at(7, 29, 50));
        clock.advance(Duration::seconds(20));
        assert_eq!(clock.now(), Some(at(7, 30, 10)));
    }

    #[test]
    fn unset_clock_stays_unset_when_advanced() {
        let clock = ManualClock::unset();
        clock.advance(Duration::seconds(10));
        assert_eq!(clock.now(), None);
    }
}
