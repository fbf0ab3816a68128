//! # Repository Module
//!
//! Database repository implementations for BarberDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler / seed binary                                            │
//! │       │                                                                 │
//! │       │  db.bookings().create(&new_booking)                            │
//! │       ▼                                                                 │
//! │  BookingRepository                                                     │
//! │  ├── create(&self, new)          ← conflict check + insert, one tx     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list_for_date(&self, ...)                                         │
//! │  └── update_status(&self, ...)                                         │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into `#[derive(sqlx::FromRow)]` structs with plain column
//! types, then converted into core types. Times and dates are stored as
//! `HH:MM` / `YYYY-MM-DD` text and re-validated on the way out, so a bad
//! value surfaces as [`DbError::CorruptRow`] instead of a wrong answer.
//!
//! ## Available Repositories
//!
//! - [`barber::BarberRepository`] - Barbers
//! - [`customer::CustomerRepository`] - Customers
//! - [`schedule::ScheduleRepository`] - Weekly schedules and time-off
//! - [`booking::BookingRepository`] - Bookings and the conflict gate

pub mod barber;
pub mod booking;
pub mod customer;
pub mod schedule;

use barberdesk_core::time::{parse_date, TimeOfDay};
use chrono::NaiveDate;

use crate::error::{DbError, DbResult};

pub(crate) fn decode_time(table: &'static str, id: &str, value: &str) -> DbResult<TimeOfDay> {
    TimeOfDay::parse(value).map_err(|e| DbError::corrupt(table, id, e))
}

pub(crate) fn decode_optional_time(
    table: &'static str,
    id: &str,
    value: Option<&str>,
) -> DbResult<Option<TimeOfDay>> {
    value.map(|v| decode_time(table, id, v)).transpose()
}

pub(crate) fn decode_date(table: &'static str, id: &str, value: &str) -> DbResult<NaiveDate> {
    parse_date(value).map_err(|e| DbError::corrupt(table, id, e))
}

/// `YYYY-MM-DD`, the stored form.
pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn transaction_failed(err: sqlx::Error) -> DbError {
    DbError::TransactionFailed(err.to_string())
}
