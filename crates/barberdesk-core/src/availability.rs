//! # Availability Engine
//!
//! Combines a barber's weekly schedule, time-off, existing bookings and the
//! slot grid into a per-day availability report, and answers point queries
//! ("is this barber free at 10:30 for 45 minutes?").
//!
//! ## Day Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate_day(barber, date, slot_duration)                              │
//! │       │                                                                 │
//! │       ├── barber unknown?            → Err(BarberNotFound)             │
//! │       │                                                                 │
//! │  1.   ├── weekly entry missing or    → closed day                      │
//! │       │   is_working = false                                            │
//! │  2.   ├── time-off covers date?      → closed day + reason             │
//! │       │                                                                 │
//! │  3.   ▼ generate_slots(start, end, duration, break)                    │
//! │  4.   ▼ list_bookings(scheduled | confirmed)                           │
//! │  5.   ▼ classify: overlaps a booking? → booked : available             │
//! │  6.   ▼ past filter (date < today: none left; today: start <= now)     │
//! │  7.   ▼ summary                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every answer is computed fresh from the stores; nothing is cached or
//! written. Two calls with unchanged data and the same clock give identical
//! results.
//!
//! Point queries and the booking conflict gate use the same overlap
//! predicate as step 5 ([`crate::conflict::overlaps`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::clock::Clock;
use crate::conflict::find_conflict;
use crate::error::{CoreError, CoreResult};
use crate::slots::generate_slots;
use crate::store::{BookingStore, ScheduleStore};
use crate::time::{day_of_week, TimeOfDay};
use crate::types::{Booking, BookingStatus, WeeklySchedule};
use crate::validation::{validate_booking_duration, validate_slot_duration};

// =============================================================================
// Report Types
// =============================================================================

/// A slot a customer can book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    #[ts(as = "String")]
    pub time: TimeOfDay,
    pub duration: u32,
}

/// The booking that blocks a slot, as shown to shop staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingInfo {
    pub id: String,
    #[ts(as = "String")]
    pub time: TimeOfDay,
    pub duration: u32,
    pub customer: Option<String>,
    pub mobile: Option<String>,
    pub status: BookingStatus,
}

impl From<&Booking> for BookingInfo {
    fn from(b: &Booking) -> Self {
        BookingInfo {
            id: b.id.clone(),
            time: b.start_time,
            duration: b.duration_minutes,
            customer: b.customer_name.clone(),
            mobile: b.customer_mobile.clone(),
            status: b.status,
        }
    }
}

/// A slot overlapping an active booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    #[ts(as = "String")]
    pub time: TimeOfDay,
    pub duration: u32,
    /// First overlapping booking in start-time order.
    pub booking: BookingInfo,
}

/// Working hours the slots were generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindow {
    #[ts(as = "String")]
    pub start_time: TimeOfDay,
    #[ts(as = "String")]
    pub end_time: TimeOfDay,
    #[ts(as = "Option<String>")]
    pub break_start: Option<TimeOfDay>,
    #[ts(as = "Option<String>")]
    pub break_end: Option<TimeOfDay>,
    pub slot_duration: u32,
}

/// Slot counts for a day.
///
/// `total_slots = available_count + booked_count`. `booked_count` covers
/// every slot that cannot be booked, so it includes the `past_count` slots
/// that are free but already behind the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub total_slots: usize,
    pub available_count: usize,
    pub booked_count: usize,
    pub past_count: usize,
}

/// Full availability report for one barber on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub barber_id: String,
    pub is_working_day: bool,
    pub is_past_date: bool,
    /// Time-off reason when the day is closed for time-off.
    pub reason: Option<String>,
    pub schedule: Option<ScheduleWindow>,
    pub available_slots: Vec<AvailableSlot>,
    pub booked_slots: Vec<BookedSlot>,
    pub summary: AvailabilitySummary,
}

impl DayAvailability {
    fn closed(barber_id: &str, date: NaiveDate, is_past_date: bool, reason: Option<String>) -> Self {
        DayAvailability {
            date,
            barber_id: barber_id.to_string(),
            is_working_day: false,
            is_past_date,
            reason,
            schedule: None,
            available_slots: Vec::new(),
            booked_slots: Vec::new(),
            summary: AvailabilitySummary::default(),
        }
    }
}

// =============================================================================
// Pure classification
// =============================================================================

/// Candidates split by whether an active booking overlaps them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub available: Vec<AvailableSlot>,
    pub booked: Vec<BookedSlot>,
}

/// Splits candidate slot starts into available and booked.
///
/// A slot `[s, s + duration)` is booked when it overlaps any blocking
/// booking; it carries the first such booking. Input order is preserved in
/// both outputs.
pub fn classify_slots(candidates: &[TimeOfDay], duration: u32, bookings: &[Booking]) -> Classification {
    let mut result = Classification::default();

    for &time in candidates {
        match find_conflict(bookings, time, duration, None) {
            Some(booking) => result.booked.push(BookedSlot {
                time,
                duration,
                booking: BookingInfo::from(booking),
            }),
            None => result.available.push(AvailableSlot { time, duration }),
        }
    }

    result
}

/// Removes slots that are no longer bookable because of the clock.
///
/// - `date` before `today`: everything is past.
/// - `date == today`: slots starting at or before `now` are past.
/// - later dates: untouched.
///
/// Returns `(still_available, past_count)`.
pub fn drop_past_slots(
    available: Vec<AvailableSlot>,
    date: NaiveDate,
    today: NaiveDate,
    now: TimeOfDay,
) -> (Vec<AvailableSlot>, usize) {
    if date < today {
        let past = available.len();
        return (Vec::new(), past);
    }

    if date > today {
        return (available, 0);
    }

    let before = available.len();
    let kept: Vec<AvailableSlot> = available.into_iter().filter(|s| s.time > now).collect();
    let past = before - kept.len();
    (kept, past)
}

// =============================================================================
// Engine
// =============================================================================

/// Availability queries over a schedule store, a booking store and a clock.
///
/// ## Example
/// ```rust
/// use barberdesk_core::availability::AvailabilityEngine;
/// use barberdesk_core::clock::FixedClock;
/// use barberdesk_core::memory::InMemoryStore;
/// use barberdesk_core::time::TimeOfDay;
/// use chrono::NaiveDate;
///
/// # tokio_test_block_on(async {
/// let store = InMemoryStore::new();
/// store.add_barber("b1");
/// let today = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
/// let engine = AvailabilityEngine::new(
///     store.clone(),
///     store,
///     FixedClock::at(today, TimeOfDay::MIDNIGHT),
/// );
///
/// // No weekly schedule yet: closed
/// let day = engine.evaluate_day("b1", today, 30).await.unwrap();
/// assert!(!day.is_working_day);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AvailabilityEngine<S, B, C> {
    schedules: S,
    bookings: B,
    clock: C,
}

impl<S, B, C> AvailabilityEngine<S, B, C>
where
    S: ScheduleStore,
    B: BookingStore,
    C: Clock,
{
    pub fn new(schedules: S, bookings: B, clock: C) -> Self {
        AvailabilityEngine {
            schedules,
            bookings,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Fails with [`CoreError::BarberNotFound`] for unknown barbers.
    pub async fn ensure_barber(&self, barber_id: &str) -> CoreResult<()> {
        if self.schedules.barber_exists(barber_id).await? {
            Ok(())
        } else {
            Err(CoreError::BarberNotFound(barber_id.to_string()))
        }
    }

    /// Full availability report for one date.
    pub async fn evaluate_day(
        &self,
        barber_id: &str,
        date: NaiveDate,
        slot_duration: u32,
    ) -> CoreResult<DayAvailability> {
        validate_slot_duration(slot_duration)?;
        self.ensure_barber(barber_id).await?;
        self.evaluate_known_barber(barber_id, date, slot_duration).await
    }

    /// Day evaluation without the barber lookup or duration check. Range
    /// queries do both once up front.
    pub(crate) async fn evaluate_known_barber(
        &self,
        barber_id: &str,
        date: NaiveDate,
        slot_duration: u32,
    ) -> CoreResult<DayAvailability> {
        let today = self.clock.today();
        let is_past_date = date < today;

        let entry = match self.working_entry(barber_id, date).await? {
            Some(entry) => entry,
            None => {
                debug!(barber_id, %date, "Not a working day");
                return Ok(DayAvailability::closed(barber_id, date, is_past_date, None));
            }
        };

        if let Some(period) = self.schedules.time_off_covering(barber_id, date).await? {
            debug!(barber_id, %date, reason = %period.reason, "Barber on time off");
            return Ok(DayAvailability::closed(
                barber_id,
                date,
                is_past_date,
                Some(period.reason),
            ));
        }

        let candidates = generate_slots(
            entry.start_time,
            entry.end_time,
            slot_duration,
            entry.break_start,
            entry.break_end,
        );

        let bookings = self
            .bookings
            .list_bookings(barber_id, date, &BookingStatus::ACTIVE)
            .await?;

        let Classification { available, booked } = classify_slots(&candidates, slot_duration, &bookings);
        let (available, past_count) =
            drop_past_slots(available, date, today, self.clock.time_of_day());

        let summary = AvailabilitySummary {
            total_slots: candidates.len(),
            available_count: available.len(),
            booked_count: candidates.len() - available.len(),
            past_count,
        };

        debug!(
            barber_id,
            %date,
            total = summary.total_slots,
            available = summary.available_count,
            booked = booked.len(),
            past = past_count,
            "Evaluated day"
        );

        Ok(DayAvailability {
            date,
            barber_id: barber_id.to_string(),
            is_working_day: true,
            is_past_date,
            reason: None,
            schedule: Some(ScheduleWindow {
                start_time: entry.start_time,
                end_time: entry.end_time,
                break_start: entry.break_start,
                break_end: entry.break_end,
                slot_duration,
            }),
            available_slots: available,
            booked_slots: booked,
            summary,
        })
    }

    /// Whether `[time, time + duration)` on `date` is free: a working day,
    /// no time-off, and no overlap with a scheduled or confirmed booking.
    ///
    /// Working hours and the clock are not consulted, matching the booking
    /// gate's behaviour.
    pub async fn is_available(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: TimeOfDay,
        duration: u32,
    ) -> CoreResult<bool> {
        validate_booking_duration(duration)?;
        self.ensure_barber(barber_id).await?;

        if self.working_entry(barber_id, date).await?.is_none() {
            return Ok(false);
        }

        if self
            .schedules
            .time_off_covering(barber_id, date)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let bookings = self
            .bookings
            .list_bookings(barber_id, date, &BookingStatus::ACTIVE)
            .await?;

        Ok(find_conflict(&bookings, time, duration, None).is_none())
    }

    /// Whether a booking at `[time, time + duration)` would overlap an
    /// existing scheduled or confirmed booking, ignoring `exclude_booking_id`
    /// (the booking being moved, when updating in place).
    ///
    /// This only reads. Callers must perform the check and the insert in one
    /// atomic unit, otherwise two requests can both pass the check.
    pub async fn has_conflict(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: TimeOfDay,
        duration: u32,
        exclude_booking_id: Option<&str>,
    ) -> CoreResult<bool> {
        validate_booking_duration(duration)?;
        self.ensure_barber(barber_id).await?;

        let bookings = self
            .bookings
            .list_bookings(barber_id, date, &BookingStatus::ACTIVE)
            .await?;

        let conflict = find_conflict(&bookings, time, duration, exclude_booking_id);
        if let Some(booking) = conflict {
            debug!(barber_id, %date, %time, conflicting = %booking.id, "Booking conflict");
        }

        Ok(conflict.is_some())
    }

    /// The weekly entry for `date`'s weekday, only if it is a working day.
    async fn working_entry(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> CoreResult<Option<WeeklySchedule>> {
        let entry = self
            .schedules
            .weekly_entry(barber_id, day_of_week(date))
            .await?;
        Ok(entry.filter(|e| e.is_working))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn booking(start: &str, duration: u32, status: BookingStatus) -> Booking {
        Booking {
            id: format!("bk-{}", start),
            barber_id: "b1".to_string(),
            customer_id: "c1".to_string(),
            customer_name: Some("Alex".to_string()),
            customer_mobile: Some("555-0100".to_string()),
            date: d(16),
            start_time: t(start),
            duration_minutes: duration,
            status,
        }
    }

    fn slot_times(slots: &[AvailableSlot]) -> Vec<String> {
        slots.iter().map(|s| s.time.to_string()).collect()
    }

    #[test]
    fn test_classify_sixty_minute_booking() {
        let candidates = generate_slots(t("09:00"), t("12:00"), 30, None, None);
        let bookings = vec![booking("10:00", 60, BookingStatus::Confirmed)];

        let result = classify_slots(&candidates, 30, &bookings);

        assert_eq!(slot_times(&result.available), ["09:00", "09:30", "11:00", "11:30"]);
        let booked: Vec<String> = result.booked.iter().map(|s| s.time.to_string()).collect();
        assert_eq!(booked, ["10:00", "10:30"]);
        assert_eq!(result.booked[0].booking.customer.as_deref(), Some("Alex"));
        assert_eq!(result.booked[0].booking.duration, 60);
    }

    #[test]
    fn test_classify_ignores_cancelled() {
        let candidates = vec![t("10:00")];
        let bookings = vec![booking("10:00", 30, BookingStatus::Cancelled)];
        let result = classify_slots(&candidates, 30, &bookings);
        assert_eq!(result.available.len(), 1);
        assert!(result.booked.is_empty());
    }

    #[test]
    fn test_drop_past_slots() {
        let slots: Vec<AvailableSlot> = ["14:00", "14:15", "14:30"]
            .iter()
            .map(|s| AvailableSlot { time: t(s), duration: 15 })
            .collect();

        // Today at 14:15: 14:00 and 14:15 are past
        let (kept, past) = drop_past_slots(slots.clone(), d(16), d(16), t("14:15"));
        assert_eq!(slot_times(&kept), ["14:30"]);
        assert_eq!(past, 2);

        // Yesterday: all past
        let (kept, past) = drop_past_slots(slots.clone(), d(15), d(16), t("00:00"));
        assert!(kept.is_empty());
        assert_eq!(past, 3);

        // Tomorrow: untouched
        let (kept, past) = drop_past_slots(slots, d(17), d(16), t("23:59"));
        assert_eq!(kept.len(), 3);
        assert_eq!(past, 0);
    }

    #[test]
    fn test_day_availability_serializes_camel_case() {
        let day = DayAvailability::closed("b1", d(16), false, Some("Vacation".to_string()));
        let json = serde_json::to_value(&day).unwrap();

        assert_eq!(json["date"], "2026-03-16");
        assert_eq!(json["isWorkingDay"], false);
        assert_eq!(json["isPastDate"], false);
        assert_eq!(json["reason"], "Vacation");
        assert_eq!(json["summary"]["totalSlots"], 0);
        assert!(json["availableSlots"].as_array().unwrap().is_empty());
    }
}
