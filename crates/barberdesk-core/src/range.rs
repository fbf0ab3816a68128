//! # Range Availability
//!
//! Multi-day views built by running day evaluation once per date.
//!
//! ```text
//! compute_range(b1, 2026-03-16, 2026-03-18)
//!
//!   ensure_barber(b1) ──► NotFound stops everything
//!        │
//!        ▼
//!   03-16 ── evaluate ──► DaySummary
//!   03-17 ── evaluate ──► DaySummary { error: "store unavailable" }   (kept going)
//!   03-18 ── evaluate ──► DaySummary
//! ```
//!
//! Days are evaluated one after another in ascending order. A day that
//! fails is recorded with its error and a zeroed summary; it never aborts
//! the range.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::availability::{AvailabilityEngine, AvailableSlot, BookedSlot, DayAvailability};
use crate::clock::Clock;
use crate::error::CoreResult;
use crate::store::{BookingStore, ScheduleStore};
use crate::time::{day_name, TimeOfDay};
use crate::validation::{validate_date_range, validate_next_limit, validate_slot_duration};

/// One date inside a [`RangeAvailability`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub is_working_day: bool,
    pub is_past_date: bool,
    pub reason: Option<String>,
    pub available_count: usize,
    pub booked_count: usize,
    pub available_slots: Vec<AvailableSlot>,
    pub booked_slots: Vec<BookedSlot>,
    /// Set when this date could not be evaluated.
    pub error: Option<String>,
}

impl From<DayAvailability> for DaySummary {
    fn from(day: DayAvailability) -> Self {
        DaySummary {
            is_working_day: day.is_working_day,
            is_past_date: day.is_past_date,
            reason: day.reason,
            available_count: day.summary.available_count,
            booked_count: day.summary.booked_count,
            available_slots: day.available_slots,
            booked_slots: day.booked_slots,
            error: None,
        }
    }
}

impl DaySummary {
    fn failed(message: String) -> Self {
        DaySummary {
            error: Some(message),
            ..Default::default()
        }
    }
}

/// Per-date summaries for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RangeAvailability {
    pub barber_id: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    /// Keyed by date, ascending.
    #[ts(as = "BTreeMap<String, DaySummary>")]
    pub days: BTreeMap<NaiveDate, DaySummary>,
}

/// A bookable slot on some upcoming date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NextSlot {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub time: TimeOfDay,
    pub duration: u32,
    /// English weekday name, e.g. "Monday".
    pub day_name: String,
}

/// Evaluates every date in `start..=end`.
///
/// ## Errors
/// - `end < start` or a span over `MAX_RANGE_DAYS` days: validation error
///   (the range is never truncated)
/// - unknown barber: `BarberNotFound`, checked once before any day
///
/// Per-day failures do not fail the call; they land in
/// [`DaySummary::error`].
pub async fn compute_range<S, B, C>(
    engine: &AvailabilityEngine<S, B, C>,
    barber_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    slot_duration: u32,
) -> CoreResult<RangeAvailability>
where
    S: ScheduleStore,
    B: BookingStore,
    C: Clock,
{
    let span = validate_date_range(start, end)?;
    validate_slot_duration(slot_duration)?;
    engine.ensure_barber(barber_id).await?;

    let mut days = BTreeMap::new();
    let mut failed = 0usize;

    for date in start.iter_days().take(span as usize) {
        let summary = match engine
            .evaluate_known_barber(barber_id, date, slot_duration)
            .await
        {
            Ok(day) => DaySummary::from(day),
            Err(e) => {
                warn!(barber_id, %date, error = %e, "Failed to evaluate day in range");
                failed += 1;
                DaySummary::failed(e.to_string())
            }
        };
        days.insert(date, summary);
    }

    debug!(barber_id, %start, %end, days = span, failed, "Computed range");

    Ok(RangeAvailability {
        barber_id: barber_id.to_string(),
        start_date: start,
        end_date: end,
        days,
    })
}

/// The next `limit` bookable slots, walking forward from the clock's today
/// for at most `lookahead_days` dates.
///
/// Today's slots already behind the clock are excluded the same way day
/// evaluation excludes them. Dates that fail to evaluate are logged and
/// skipped.
pub async fn next_available<S, B, C>(
    engine: &AvailabilityEngine<S, B, C>,
    barber_id: &str,
    limit: usize,
    slot_duration: u32,
    lookahead_days: u32,
) -> CoreResult<Vec<NextSlot>>
where
    S: ScheduleStore,
    B: BookingStore,
    C: Clock,
{
    validate_next_limit(limit)?;
    validate_slot_duration(slot_duration)?;
    engine.ensure_barber(barber_id).await?;

    let today = engine.clock().today();
    let mut found = Vec::with_capacity(limit);

    for offset in 0..u64::from(lookahead_days) {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };

        let day = match engine
            .evaluate_known_barber(barber_id, date, slot_duration)
            .await
        {
            Ok(day) => day,
            Err(e) => {
                warn!(barber_id, %date, error = %e, "Skipping day in next-available search");
                continue;
            }
        };

        let name = day_name(date);
        for slot in day.available_slots {
            found.push(NextSlot {
                date,
                time: slot.time,
                duration: slot.duration,
                day_name: name.clone(),
            });
            if found.len() == limit {
                return Ok(found);
            }
        }
    }

    Ok(found)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::CoreError;
    use crate::memory::InMemoryStore;
    use crate::types::WeeklySchedule;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    /// Works every day 09:00-11:00.
    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_barber("b1");
        store.set_week(
            "b1",
            (0..7)
                .map(|dow| WeeklySchedule {
                    barber_id: "b1".to_string(),
                    day_of_week: dow,
                    is_working: true,
                    start_time: t("09:00"),
                    end_time: t("11:00"),
                    break_start: None,
                    break_end: None,
                })
                .collect(),
        );
        store
    }

    fn engine(
        store: InMemoryStore,
        now: &str,
    ) -> AvailabilityEngine<InMemoryStore, InMemoryStore, FixedClock> {
        AvailabilityEngine::new(store.clone(), store, FixedClock::at(d(3, 16), t(now)))
    }

    #[tokio::test]
    async fn test_range_has_every_date() {
        let engine = engine(store(), "08:00");
        let range = compute_range(&engine, "b1", d(3, 16), d(3, 22), 30).await.unwrap();

        assert_eq!(range.days.len(), 7);
        assert_eq!(range.days.keys().next(), Some(&d(3, 16)));
        assert_eq!(range.days.keys().last(), Some(&d(3, 22)));
        assert!(range.days.values().all(|s| s.available_count == 4));
    }

    #[tokio::test]
    async fn test_range_rejects_reversed_and_unknown_barber() {
        let engine = engine(store(), "08:00");

        let reversed = compute_range(&engine, "b1", d(3, 20), d(3, 16), 30).await;
        assert!(matches!(reversed, Err(CoreError::Validation(_))));

        let unknown = compute_range(&engine, "nobody", d(3, 16), d(3, 17), 30).await;
        assert!(matches!(unknown, Err(CoreError::BarberNotFound(_))));
    }

    #[tokio::test]
    async fn test_range_records_failed_day() {
        let store = store();
        store.fail_reads_on(d(3, 17));
        let engine = engine(store, "08:00");

        let range = compute_range(&engine, "b1", d(3, 16), d(3, 18), 30).await.unwrap();

        assert_eq!(range.days.len(), 3);
        let bad = &range.days[&d(3, 17)];
        assert!(bad.error.is_some());
        assert_eq!(bad.available_count, 0);
        assert!(range.days[&d(3, 18)].error.is_none());
    }

    #[tokio::test]
    async fn test_next_available_skips_past_and_rolls_over() {
        // 10:15 today: only 10:30 is left, then tomorrow's slots
        let engine = engine(store(), "10:15");
        let next = next_available(&engine, "b1", 3, 30, 30).await.unwrap();

        let got: Vec<(NaiveDate, String)> =
            next.iter().map(|s| (s.date, s.time.to_string())).collect();
        assert_eq!(
            got,
            [
                (d(3, 16), "10:30".to_string()),
                (d(3, 17), "09:00".to_string()),
                (d(3, 17), "09:30".to_string()),
            ]
        );
        assert_eq!(next[0].day_name, "Monday");
    }

    #[tokio::test]
    async fn test_next_available_limit_bounds() {
        let engine = engine(store(), "08:00");
        assert!(next_available(&engine, "b1", 0, 30, 30).await.is_err());
        assert!(next_available(&engine, "b1", 101, 30, 30).await.is_err());
    }

    #[tokio::test]
    async fn test_next_available_skips_failing_day() {
        let store = store();
        store.fail_reads_on(d(3, 16));
        let engine = engine(store, "08:00");

        let next = next_available(&engine, "b1", 1, 30, 30).await.unwrap();
        assert_eq!(next[0].date, d(3, 17));
    }

    #[test]
    fn test_range_serializes_date_keys() {
        let mut days = BTreeMap::new();
        days.insert(d(3, 16), DaySummary::failed("boom".to_string()));
        let range = RangeAvailability {
            barber_id: "b1".to_string(),
            start_date: d(3, 16),
            end_date: d(3, 16),
            days,
        };

        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json["days"]["2026-03-16"]["error"], "boom");
        assert_eq!(json["startDate"], "2026-03-16");
    }
}
