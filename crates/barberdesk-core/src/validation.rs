//! # Validation Module
//!
//! Input checks that run before a request reaches the availability engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (barberdesk-api)                                │
//! │  ├── Query/body deserialization                                        │
//! │  └── THIS MODULE: formats, bounds, range length                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (availability / range)                                │
//! │  └── Assumes validated input; re-checks only what it must             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on times and durations                         │
//! │  └── UNIQUE (barber_id, day_of_week)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::time::TimeOfDay;
use crate::types::{BookingStatus, NewBooking, TimeOff, WeeklySchedule};
use crate::{
    MAX_BOOKING_DURATION_MINUTES, MAX_NEXT_LIMIT, MAX_RANGE_DAYS, MAX_SLOT_DURATION_MINUTES,
    MIN_SLOT_DURATION_MINUTES,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a UUID string (barber, customer, booking ids).
///
/// ## Example
/// ```rust
/// use barberdesk_core::validation::validate_id;
///
/// assert!(validate_id("barberId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_id("barberId", "not-a-uuid").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Durations and limits
// =============================================================================

/// Validates a requested slot duration.
///
/// ## Rules
/// - Must be positive
/// - Must be between 5 and 240 minutes
pub fn validate_slot_duration(minutes: u32) -> ValidationResult<()> {
    if minutes == 0 {
        return Err(ValidationError::MustBePositive {
            field: "slotDuration".to_string(),
        });
    }

    if !(MIN_SLOT_DURATION_MINUTES..=MAX_SLOT_DURATION_MINUTES).contains(&minutes) {
        return Err(ValidationError::OutOfRange {
            field: "slotDuration".to_string(),
            min: MIN_SLOT_DURATION_MINUTES as i64,
            max: MAX_SLOT_DURATION_MINUTES as i64,
        });
    }

    Ok(())
}

/// Validates a booking / point-query duration (1..=480 minutes).
pub fn validate_booking_duration(minutes: u32) -> ValidationResult<()> {
    if minutes == 0 {
        return Err(ValidationError::MustBePositive {
            field: "duration".to_string(),
        });
    }

    if minutes > MAX_BOOKING_DURATION_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "duration".to_string(),
            min: 1,
            max: MAX_BOOKING_DURATION_MINUTES as i64,
        });
    }

    Ok(())
}

/// Validates the `limit` of a next-available query.
pub fn validate_next_limit(limit: usize) -> ValidationResult<()> {
    if limit == 0 || limit > MAX_NEXT_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_NEXT_LIMIT as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Date ranges
// =============================================================================

/// Validates a multi-day query and returns the inclusive day count.
///
/// ## Rules
/// - `end >= start`
/// - At most 30 days inclusive. 30 is accepted, 31 is rejected; the range is
///   never truncated.
///
/// ## Example
/// ```rust
/// use barberdesk_core::validation::validate_date_range;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(validate_date_range(start, start).unwrap(), 1);
/// assert!(validate_date_range(start, NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()).is_ok());
/// assert!(validate_date_range(start, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()).is_err());
/// ```
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<u32> {
    if end < start {
        return Err(ValidationError::invalid_range(
            "date range",
            format!("endDate {} is before startDate {}", end, start),
        ));
    }

    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS as i64 {
        return Err(ValidationError::OutOfRange {
            field: "date range (days)".to_string(),
            min: 1,
            max: MAX_RANGE_DAYS as i64,
        });
    }

    Ok(days as u32)
}

// =============================================================================
// Schedule records
// =============================================================================

/// Validates one weekly schedule entry.
///
/// Non-working days are accepted whatever their times say.
pub fn validate_weekly_entry(entry: &WeeklySchedule) -> ValidationResult<()> {
    if entry.day_of_week > 6 {
        return Err(ValidationError::OutOfRange {
            field: "dayOfWeek".to_string(),
            min: 0,
            max: 6,
        });
    }

    if !entry.is_working {
        return Ok(());
    }

    if entry.start_time >= entry.end_time {
        return Err(ValidationError::invalid_range(
            "working hours",
            format!("start {} must be before end {}", entry.start_time, entry.end_time),
        ));
    }

    match (entry.break_start, entry.break_end) {
        (None, None) => Ok(()),
        (Some(bs), Some(be)) => validate_break(entry.start_time, entry.end_time, bs, be),
        _ => Err(ValidationError::invalid_range(
            "break",
            "breakStart and breakEnd must be given together",
        )),
    }
}

fn validate_break(
    start: TimeOfDay,
    end: TimeOfDay,
    break_start: TimeOfDay,
    break_end: TimeOfDay,
) -> ValidationResult<()> {
    if break_start >= break_end {
        return Err(ValidationError::invalid_range(
            "break",
            format!("start {} must be before end {}", break_start, break_end),
        ));
    }

    if break_start < start || break_end > end {
        return Err(ValidationError::invalid_range(
            "break",
            format!(
                "{}-{} lies outside working hours {}-{}",
                break_start, break_end, start, end
            ),
        ));
    }

    Ok(())
}

/// Validates a full week submitted for wholesale replacement: every entry
/// valid, one barber, no day listed twice.
pub fn validate_week(barber_id: &str, entries: &[WeeklySchedule]) -> ValidationResult<()> {
    let mut seen = HashSet::new();

    for entry in entries {
        if entry.barber_id != barber_id {
            return Err(ValidationError::invalid_range(
                "barberId",
                format!("entry for {} submitted under {}", entry.barber_id, barber_id),
            ));
        }

        validate_weekly_entry(entry)?;

        if !seen.insert(entry.day_of_week) {
            return Err(ValidationError::invalid_range(
                "dayOfWeek",
                format!("day {} listed more than once", entry.day_of_week),
            ));
        }
    }

    Ok(())
}

/// Validates a time-off period.
pub fn validate_time_off(period: &TimeOff) -> ValidationResult<()> {
    if period.end_date < period.start_date {
        return Err(ValidationError::invalid_range(
            "time off",
            format!(
                "endDate {} is before startDate {}",
                period.end_date, period.start_date
            ),
        ));
    }

    if period.reason.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    Ok(())
}

/// Validates a booking before it is handed to the store.
pub fn validate_new_booking(booking: &NewBooking) -> ValidationResult<()> {
    validate_id("barberId", &booking.barber_id)?;
    validate_id("customerId", &booking.customer_id)?;
    validate_booking_duration(booking.duration_minutes)?;

    if !booking.status.blocks_availability() {
        return Err(ValidationError::NotAllowed {
            field: "status".to_string(),
            allowed: BookingStatus::ACTIVE
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BARBER: &str = "550e8400-e29b-41d4-a716-446655440000";
    const CUSTOMER: &str = "6f1c7e3a-9d7b-4a1e-8a52-0c6b2f6d9e11";

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(day: u8, start: &str, end: &str, brk: Option<(&str, &str)>) -> WeeklySchedule {
        WeeklySchedule {
            barber_id: BARBER.to_string(),
            day_of_week: day,
            is_working: true,
            start_time: t(start),
            end_time: t(end),
            break_start: brk.map(|(s, _)| t(s)),
            break_end: brk.map(|(_, e)| t(e)),
        }
    }

    #[test]
    fn test_validate_slot_duration() {
        assert!(validate_slot_duration(30).is_ok());
        assert!(validate_slot_duration(5).is_ok());
        assert!(validate_slot_duration(240).is_ok());

        assert!(matches!(
            validate_slot_duration(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_slot_duration(4).is_err());
        assert!(validate_slot_duration(241).is_err());
    }

    #[test]
    fn test_validate_booking_duration() {
        assert!(validate_booking_duration(45).is_ok());
        assert!(validate_booking_duration(0).is_err());
        assert!(validate_booking_duration(481).is_err());
    }

    #[test]
    fn test_validate_date_range_boundaries() {
        let start = d(2026, 3, 1);
        assert_eq!(validate_date_range(start, d(2026, 3, 30)).unwrap(), 30);
        assert!(matches!(
            validate_date_range(start, d(2026, 3, 31)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_date_range(start, d(2026, 2, 28)),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_weekly_entry() {
        assert!(validate_weekly_entry(&entry(1, "09:00", "18:00", Some(("13:00", "14:00")))).is_ok());
        // Break flush with the working hours is fine
        assert!(validate_weekly_entry(&entry(1, "09:00", "18:00", Some(("09:00", "18:00")))).is_ok());

        assert!(validate_weekly_entry(&entry(1, "18:00", "09:00", None)).is_err());
        assert!(validate_weekly_entry(&entry(1, "09:00", "09:00", None)).is_err());
        assert!(validate_weekly_entry(&entry(1, "09:00", "18:00", Some(("14:00", "13:00")))).is_err());
        assert!(validate_weekly_entry(&entry(1, "09:00", "18:00", Some(("08:00", "10:00")))).is_err());
        assert!(validate_weekly_entry(&entry(7, "09:00", "18:00", None)).is_err());

        let mut half_break = entry(1, "09:00", "18:00", None);
        half_break.break_start = Some(t("13:00"));
        assert!(validate_weekly_entry(&half_break).is_err());

        // Day off: times ignored
        let mut off = entry(0, "18:00", "09:00", None);
        off.is_working = false;
        assert!(validate_weekly_entry(&off).is_ok());
    }

    #[test]
    fn test_validate_week_rejects_duplicate_days() {
        let week = vec![entry(1, "09:00", "18:00", None), entry(1, "10:00", "12:00", None)];
        assert!(validate_week(BARBER, &week).is_err());

        let week = vec![entry(1, "09:00", "18:00", None), entry(2, "10:00", "12:00", None)];
        assert!(validate_week(BARBER, &week).is_ok());
        assert!(validate_week(CUSTOMER, &week).is_err());
    }

    #[test]
    fn test_validate_time_off() {
        let mut period = TimeOff {
            id: "t".to_string(),
            barber_id: BARBER.to_string(),
            start_date: d(2026, 8, 1),
            end_date: d(2026, 8, 1),
            reason: "Holiday".to_string(),
            notes: None,
        };
        assert!(validate_time_off(&period).is_ok());

        period.end_date = d(2026, 7, 31);
        assert!(validate_time_off(&period).is_err());

        period.end_date = d(2026, 8, 2);
        period.reason = "  ".to_string();
        assert!(validate_time_off(&period).is_err());
    }

    #[test]
    fn test_validate_new_booking() {
        let mut booking = NewBooking {
            barber_id: BARBER.to_string(),
            customer_id: CUSTOMER.to_string(),
            date: d(2026, 3, 16),
            start_time: t("10:00"),
            duration_minutes: 30,
            status: BookingStatus::Scheduled,
            notes: None,
        };
        assert!(validate_new_booking(&booking).is_ok());

        booking.status = BookingStatus::Cancelled;
        assert!(validate_new_booking(&booking).is_err());

        booking.status = BookingStatus::Confirmed;
        booking.customer_id = "nope".to_string();
        assert!(validate_new_booking(&booking).is_err());
    }

    #[test]
    fn test_validate_next_limit() {
        assert!(validate_next_limit(1).is_ok());
        assert!(validate_next_limit(100).is_ok());
        assert!(validate_next_limit(0).is_err());
        assert!(validate_next_limit(101).is_err());
    }
}
