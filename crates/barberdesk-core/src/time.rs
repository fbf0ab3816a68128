//! # Wall-Clock Time and Calendar Dates
//!
//! All scheduling happens in one implicit local timezone, so the engine works
//! with plain calendar dates ([`NaiveDate`]) and minutes since midnight
//! ([`TimeOfDay`]).
//!
//! ## Wire Formats
//! ```text
//! date  "YYYY-MM-DD"   exactly 10 chars, zero padded    2026-03-16
//! time  "HH:MM"        exactly 5 chars, 24 hour clock   09:30
//! ```
//! Anything else ("9:30", "2026-3-16", "09:30:00") is rejected with a
//! [`ValidationError::InvalidFormat`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minutes in a day. Valid [`TimeOfDay`] values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// =============================================================================
// TimeOfDay
// =============================================================================

/// A wall-clock time with minute precision, stored as minutes since midnight.
///
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// 00:00
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Creates a time from hours and minutes, `None` if out of range.
    pub const fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Creates a time from minutes since midnight, `None` past 23:59.
    pub const fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(TimeOfDay(minutes as u16))
        } else {
            None
        }
    }

    /// Truncates a chrono time to the minute.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn hour(self) -> u32 {
        self.0 as u32 / 60
    }

    #[inline]
    pub const fn minute(self) -> u32 {
        self.0 as u32 % 60
    }

    /// Parses a strict `HH:MM` string.
    ///
    /// ## Example
    /// ```rust
    /// use barberdesk_core::time::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse("09:30").unwrap().minutes(), 570);
    /// assert!(TimeOfDay::parse("9:30").is_err());
    /// assert!(TimeOfDay::parse("24:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[3..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(ValidationError::invalid_format(
                "time",
                format!("'{}' is not HH:MM", s),
            ));
        }

        let hour = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
        let minute = u32::from(bytes[3] - b'0') * 10 + u32::from(bytes[4] - b'0');

        TimeOfDay::from_hm(hour, minute).ok_or_else(|| {
            ValidationError::invalid_format("time", format!("'{}' is not a valid 24-hour time", s))
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeOfDay::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a strict `YYYY-MM-DD` date.
///
/// chrono's `%Y` alone would accept signed and over-long years, so the shape
/// is checked first.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(ValidationError::invalid_format(
            "date",
            format!("'{}' is not YYYY-MM-DD", s),
        ));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        ValidationError::invalid_format("date", format!("'{}' is not a calendar date", s))
    })
}

/// Weekly schedule index for a date: 0 = Sunday ... 6 = Saturday.
#[inline]
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// English weekday name ("Monday").
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
