//! # Booking Handlers
//!
//! `conflict` is the read-only check callers run before creating or moving a
//! booking. `create` repeats that check inside the insert transaction, so two
//! racing requests for the same slot end with one 201 and one 409.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use barberdesk_core::{Booking, BookingStatus, NewBooking, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{date_param, required, time_param};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRequest {
    pub barber_id: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    #[serde(default)]
    pub exclude_booking_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub has_conflict: bool,
}

/// `POST /api/bookings/conflict`
pub async fn conflict(
    State(state): State<AppState>,
    body: Result<Json<ConflictRequest>, JsonRejection>,
) -> Result<Json<ConflictResponse>, ApiError> {
    let start = Instant::now();
    let Json(request) = body?;

    required("barberId", Some(request.barber_id.as_str()))?;
    let date = date_param("date", Some(request.date.as_str()))?;
    let time = time_param("time", Some(request.time.as_str()))?;

    let has_conflict = state
        .engine()
        .has_conflict(
            &request.barber_id,
            date,
            time,
            request.duration,
            request.exclude_booking_id.as_deref(),
        )
        .await?;

    info!(
        barber_id = %request.barber_id,
        %date,
        %time,
        duration = request.duration,
        has_conflict,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Conflict check"
    );

    Ok(Json(ConflictResponse { has_conflict }))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub barber_id: String,
    pub customer_id: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: String,
}

fn status_param(value: &str) -> Result<BookingStatus, ValidationError> {
    match value.trim() {
        "scheduled" => Ok(BookingStatus::Scheduled),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        _ => Err(ValidationError::invalid_format(
            "status",
            "expected scheduled, confirmed, completed or cancelled",
        )),
    }
}

/// `POST /api/bookings`
///
/// 201 with the stored booking, 409 `BOOKING_CONFLICT` when the time
/// overlaps an active booking.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let start = Instant::now();
    let Json(request) = body?;

    let new = NewBooking {
        barber_id: required("barberId", Some(request.barber_id.as_str()))?.to_string(),
        customer_id: required("customerId", Some(request.customer_id.as_str()))?.to_string(),
        date: date_param("date", Some(request.date.as_str()))?,
        start_time: time_param("time", Some(request.time.as_str()))?,
        duration_minutes: request.duration,
        status: match request.status.as_deref() {
            None => BookingStatus::default(),
            Some(raw) => status_param(raw)?,
        },
        notes: request.notes,
    };

    let booking = state.db.bookings().create(&new).await?;

    info!(
        booking_id = %booking.id,
        barber_id = %booking.barber_id,
        date = %booking.date,
        time = %booking.start_time,
        duration = booking.duration_minutes,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// `PATCH /api/bookings/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<Booking>, ApiError> {
    let start = Instant::now();
    let Json(request) = body?;
    let next = status_param(&request.status)?;

    let booking = state.db.bookings().update_status(&id, next).await?;

    info!(
        booking_id = %id,
        status = next.as_str(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Booking status updated"
    );

    Ok(Json(booking))
}
