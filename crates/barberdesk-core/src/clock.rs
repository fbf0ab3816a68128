//! # Clock Capability
//!
//! "Now" is injected so the today/past-slot filtering can be exercised with
//! fixed timestamps. [`SystemClock`] is the only place in the core that reads
//! the real clock.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::time::TimeOfDay;

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Current local wall-clock date and time.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current time of day, truncated to the minute.
    fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_naive_time(self.now().time())
    }
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        FixedClock(now)
    }

    /// Frozen at `date` + `time`.
    pub fn at(date: NaiveDate, time: TimeOfDay) -> Self {
        // TimeOfDay is always a valid HH:MM, so the fallback is unreachable
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default();
        FixedClock(NaiveDateTime::new(date, time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let clock = FixedClock::at(date, TimeOfDay::parse("14:15").unwrap());

        assert_eq!(clock.today(), date);
        assert_eq!(clock.time_of_day().to_string(), "14:15");
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_arc_clock_delegates() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let clock = std::sync::Arc::new(FixedClock::at(date, TimeOfDay::MIDNIGHT));
        assert_eq!(clock.today(), date);
    }
}
