//! # HTTP Routes
//!
//! ```text
//! GET   /health
//! GET   /api/barbers/{id}/availability          ?date&slotDuration
//! GET   /api/barbers/{id}/availability/range    ?startDate&endDate&slotDuration
//! GET   /api/barbers/{id}/availability/next     ?limit&slotDuration
//! GET   /api/barbers/{id}/availability/check    ?date&time&duration
//! POST  /api/bookings                           {barberId, customerId, date, time, duration, status?, notes?}
//! PATCH /api/bookings/{id}/status               {status}
//! POST  /api/bookings/conflict                  {barberId, date, time, duration, excludeBookingId?}
//! ```
//!
//! Query values arrive as strings and are parsed here, so a malformed date,
//! time or number becomes a `VALIDATION_ERROR` body rather than axum's plain
//! text rejection.

pub mod availability;
pub mod bookings;

use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use barberdesk_core::time::parse_date;
use barberdesk_core::{TimeOfDay, ValidationError};
use chrono::NaiveDate;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/barbers/{id}/availability", get(availability::day))
        .route("/api/barbers/{id}/availability/range", get(availability::range))
        .route("/api/barbers/{id}/availability/next", get(availability::next))
        .route("/api/barbers/{id}/availability/check", get(availability::check))
        .route("/api/bookings", post(bookings::create))
        .route("/api/bookings/{id}/status", patch(bookings::update_status))
        .route("/api/bookings/conflict", post(bookings::conflict))
        .with_state(state)
}

/// 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok", "database": true })))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": false })),
        )
    }
}

// =============================================================================
// Parameter parsing
// =============================================================================

pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Strict `YYYY-MM-DD`.
pub(crate) fn date_param(field: &str, value: Option<&str>) -> Result<NaiveDate, ValidationError> {
    parse_date(required(field, value)?)
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

/// Strict 24h `HH:MM`.
pub(crate) fn time_param(field: &str, value: Option<&str>) -> Result<TimeOfDay, ValidationError> {
    TimeOfDay::parse(required(field, value)?)
        .map_err(|_| ValidationError::invalid_format(field, "expected HH:MM (24h)"))
}

/// Whole number, `default` when absent.
pub(crate) fn number_param<T: FromStr>(
    field: &str,
    value: Option<&str>,
    default: T,
) -> Result<T, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ValidationError::invalid_format(field, "expected a whole number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_param() {
        assert_eq!(
            date_param("date", Some("2026-03-16")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
        );
        assert!(matches!(
            date_param("date", None),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            date_param("startDate", Some("2026/03/16")),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "startDate"
        ));
        assert!(date_param("date", Some("2026-3-16")).is_err());
    }

    #[test]
    fn test_time_param() {
        assert_eq!(time_param("time", Some("09:30")).unwrap().minutes(), 570);
        assert!(time_param("time", Some("9:30")).is_err());
        assert!(time_param("time", Some("24:00")).is_err());
        assert!(time_param("time", Some("")).is_err());
    }

    #[test]
    fn test_number_param() {
        assert_eq!(number_param("slotDuration", None, 30u32).unwrap(), 30);
        assert_eq!(number_param("slotDuration", Some("45"), 30u32).unwrap(), 45);
        assert!(number_param("slotDuration", Some("half an hour"), 30u32).is_err());
        assert!(number_param("limit", Some("-1"), 10usize).is_err());
    }
}
