//! # Domain Types
//!
//! Records the availability engine reads. The stores own them; the engine
//! never mutates them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ WeeklySchedule  │   │    TimeOff      │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  barber_id      │   │  barber_id      │   │  barber_id      │       │
//! │  │  day_of_week    │   │  start_date     │   │  date           │       │
//! │  │  is_working     │   │  end_date (incl)│   │  start_time     │       │
//! │  │  start / end    │   │  reason         │   │  duration_min   │       │
//! │  │  break window?  │   │                 │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Barber      │   │    Customer     │   │ BookingStatus   │       │
//! │  │  id, name       │   │  id, name       │   │  Scheduled ●    │       │
//! │  │  is_active      │   │  mobile?        │   │  Confirmed ●    │       │
//! │  └─────────────────┘   └─────────────────┘   │  Completed      │       │
//! │                                              │  Cancelled      │       │
//! │                        ● = blocks slots      └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::time::TimeOfDay;

// =============================================================================
// Barber / Customer
// =============================================================================

/// A barber working at the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    /// Inactive barbers keep their history but are hidden from booking.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A customer who books appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub mobile: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Weekly Schedule
// =============================================================================

/// One day of a barber's weekly working pattern.
///
/// ## Invariants
/// - `day_of_week` in `0..=6`, 0 = Sunday
/// - `start_time < end_time`
/// - break bounds are both present or both absent, and
///   `start_time <= break_start < break_end <= end_time`
///
/// When `is_working` is false the times carry no meaning. See
/// [`crate::validation::validate_weekly_entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub barber_id: String,
    pub day_of_week: u8,
    pub is_working: bool,
    #[ts(as = "String")]
    pub start_time: TimeOfDay,
    #[ts(as = "String")]
    pub end_time: TimeOfDay,
    #[ts(as = "Option<String>")]
    pub break_start: Option<TimeOfDay>,
    #[ts(as = "Option<String>")]
    pub break_end: Option<TimeOfDay>,
}

impl WeeklySchedule {
    /// The break as a half-open window, if both bounds are set.
    pub fn break_window(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

// =============================================================================
// Time Off
// =============================================================================

/// An inclusive run of dates on which a barber does not work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TimeOff {
    pub id: String,
    pub barber_id: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    /// Inclusive.
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub reason: String,
    pub notes: Option<String>,
}

impl TimeOff {
    /// Whether `date` falls inside the period (both ends inclusive).
    #[inline]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle of a booking.
///
/// ```text
/// Scheduled ──► Confirmed ──► Completed
///     │             │
///     └──────┬──────┘
///            ▼
///        Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that occupy the barber's chair.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Scheduled, BookingStatus::Confirmed];

    /// Whether a booking in this status blocks overlapping slots.
    #[inline]
    pub fn blocks_availability(self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::Confirmed)
    }

    /// Whether `self → next` is an allowed status change.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Scheduled, Confirmed)
                | (Scheduled, Completed)
                | (Scheduled, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    /// Lowercase name, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Scheduled
    }
}

// =============================================================================
// Booking
// =============================================================================

/// An appointment occupying `[start_time, start_time + duration_minutes)`.
///
/// `customer_name` / `customer_mobile` are joined in by the store so booked
/// slots can show who is in the chair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub barber_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub customer_mobile: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: TimeOfDay,
    pub duration_minutes: u32,
    pub status: BookingStatus,
}

impl Booking {
    /// End of the booking in minutes since midnight (exclusive). May exceed
    /// 24h for late bookings; overlap math is done on plain minutes.
    #[inline]
    pub fn end_minutes(&self) -> u32 {
        self.start_time.minutes() + self.duration_minutes
    }
}

/// Data needed to create a booking. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub barber_id: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: TimeOfDay,
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: BookingStatus,
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
