//! # Availability Handlers
//!
//! Read-only queries over one barber's calendar. Every handler builds an
//! engine from the shared state, so each request reads a fresh snapshot.

use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use barberdesk_core::range::{compute_range, next_available, NextSlot, RangeAvailability};
use barberdesk_core::{DayAvailability, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_NEXT_LIMIT};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{date_param, number_param, time_param};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayQuery {
    pub date: Option<String>,
    pub slot_duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub slot_duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuery {
    pub limit: Option<String>,
    pub slot_duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub available: bool,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// `GET /api/barbers/{id}/availability`
pub async fn day(
    State(state): State<AppState>,
    Path(barber_id): Path<String>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<DayAvailability>, ApiError> {
    let start = Instant::now();
    let Query(query) = query?;

    let date = date_param("date", query.date.as_deref())?;
    let slot_duration = number_param(
        "slotDuration",
        query.slot_duration.as_deref(),
        state.default_slot_duration,
    )?;

    let day = state
        .engine()
        .evaluate_day(&barber_id, date, slot_duration)
        .await?;

    info!(
        %barber_id,
        %date,
        available = day.summary.available_count,
        elapsed_ms = elapsed_ms(start),
        "Day availability"
    );

    Ok(Json(day))
}

/// `GET /api/barbers/{id}/availability/range`
pub async fn range(
    State(state): State<AppState>,
    Path(barber_id): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<RangeAvailability>, ApiError> {
    let start = Instant::now();
    let Query(query) = query?;

    let start_date = date_param("startDate", query.start_date.as_deref())?;
    let end_date = date_param("endDate", query.end_date.as_deref())?;
    let slot_duration = number_param(
        "slotDuration",
        query.slot_duration.as_deref(),
        state.default_slot_duration,
    )?;

    let engine = state.engine();
    let range = compute_range(&engine, &barber_id, start_date, end_date, slot_duration).await?;

    info!(
        %barber_id,
        %start_date,
        %end_date,
        days = range.days.len(),
        elapsed_ms = elapsed_ms(start),
        "Range availability"
    );

    Ok(Json(range))
}

/// `GET /api/barbers/{id}/availability/next`
pub async fn next(
    State(state): State<AppState>,
    Path(barber_id): Path<String>,
    query: Result<Query<NextQuery>, QueryRejection>,
) -> Result<Json<Vec<NextSlot>>, ApiError> {
    let start = Instant::now();
    let Query(query) = query?;

    let limit = number_param("limit", query.limit.as_deref(), DEFAULT_NEXT_LIMIT)?;
    let slot_duration = number_param(
        "slotDuration",
        query.slot_duration.as_deref(),
        state.default_slot_duration,
    )?;

    let engine = state.engine();
    let slots = next_available(
        &engine,
        &barber_id,
        limit,
        slot_duration,
        DEFAULT_LOOKAHEAD_DAYS,
    )
    .await?;

    info!(
        %barber_id,
        found = slots.len(),
        elapsed_ms = elapsed_ms(start),
        "Next available"
    );

    Ok(Json(slots))
}

/// `GET /api/barbers/{id}/availability/check`
///
/// `duration` defaults to the configured slot length.
pub async fn check(
    State(state): State<AppState>,
    Path(barber_id): Path<String>,
    query: Result<Query<CheckQuery>, QueryRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let start = Instant::now();
    let Query(query) = query?;

    let date = date_param("date", query.date.as_deref())?;
    let time = time_param("time", query.time.as_deref())?;
    let duration = number_param(
        "duration",
        query.duration.as_deref(),
        state.default_slot_duration,
    )?;

    let available = state
        .engine()
        .is_available(&barber_id, date, time, duration)
        .await?;

    info!(
        %barber_id,
        %date,
        %time,
        available,
        elapsed_ms = elapsed_ms(start),
        "Availability check"
    );

    Ok(Json(CheckResponse { available }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{at, shop};

    fn day_query(date: &str, slot_duration: Option<&str>) -> Result<Query<DayQuery>, QueryRejection> {
        Ok(Query(DayQuery {
            date: Some(date.to_string()),
            slot_duration: slot_duration.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_day_with_booking() {
        let (state, barber_id) = shop(at("2026-03-15", "12:00")).await;

        let Json(report) = day(State(state), Path(barber_id), day_query("2026-03-16", None))
            .await
            .unwrap();

        assert!(report.is_working_day);
        assert_eq!(report.summary.total_slots, 16);
        assert_eq!(report.summary.available_count, 14);
        assert_eq!(report.booked_slots.len(), 2);
        assert_eq!(report.booked_slots[0].time.to_string(), "10:00");
    }

    #[tokio::test]
    async fn test_day_rejects_malformed_input() {
        let (state, barber_id) = shop(at("2026-03-15", "12:00")).await;

        let err = day(
            State(state.clone()),
            Path(barber_id.clone()),
            day_query("16-03-2026", None),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = day(State(state), Path(barber_id), day_query("2026-03-16", Some("0")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_barber_is_not_found() {
        let (state, _) = shop(at("2026-03-15", "12:00")).await;

        let err = day(State(state), Path("nobody".to_string()), day_query("2026-03-16", None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_range_over_limit() {
        let (state, barber_id) = shop(at("2026-03-15", "12:00")).await;

        let query = RangeQuery {
            start_date: Some("2026-03-16".into()),
            end_date: Some("2026-04-15".into()),
            slot_duration: None,
        };
        let err = range(State(state.clone()), Path(barber_id.clone()), Ok(Query(query)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let query = RangeQuery {
            start_date: Some("2026-03-16".into()),
            end_date: Some("2026-03-22".into()),
            slot_duration: None,
        };
        let Json(week) = range(State(state), Path(barber_id), Ok(Query(query)))
            .await
            .unwrap();
        assert_eq!(week.days.len(), 7);
    }

    #[tokio::test]
    async fn test_next_starts_after_now() {
        let (state, barber_id) = shop(at("2026-03-16", "16:45")).await;

        let query = NextQuery {
            limit: Some("3".into()),
            slot_duration: None,
        };
        let Json(slots) = next(State(state), Path(barber_id), Ok(Query(query)))
            .await
            .unwrap();

        let times: Vec<String> = slots.iter().map(|s| s.time.to_string()).collect();
        assert_eq!(times, vec!["17:00", "17:30", "09:00"]);
        assert_eq!(slots[2].day_name, "Tuesday");
    }

    #[tokio::test]
    async fn test_check() {
        let (state, barber_id) = shop(at("2026-03-15", "12:00")).await;

        let ask = |time: &str| -> Result<Query<CheckQuery>, QueryRejection> {
            Ok(Query(CheckQuery {
                date: Some("2026-03-16".into()),
                time: Some(time.into()),
                duration: Some("30".into()),
            }))
        };

        let Json(busy) = check(State(state.clone()), Path(barber_id.clone()), ask("10:30"))
            .await
            .unwrap();
        assert!(!busy.available);

        let Json(free) = check(State(state.clone()), Path(barber_id.clone()), ask("11:00"))
            .await
            .unwrap();
        assert!(free.available);

        let err = check(State(state), Path(barber_id), ask("11.00"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
