//! # Store Interfaces
//!
//! Read-only ports through which the availability engine sees schedules and
//! bookings. The engine never writes through them.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   AvailabilityEngine<S: ScheduleStore, B: BookingStore, C: Clock>       │
//! │              │                         │                                │
//! │              ▼                         ▼                                │
//! │   ┌─────────────────────┐   ┌─────────────────────┐                    │
//! │   │ InMemoryStore       │   │ barberdesk-db       │                    │
//! │   │ (this crate, fakes) │   │ ScheduleRepository  │                    │
//! │   │                     │   │ BookingRepository   │                    │
//! │   └─────────────────────┘   └─────────────────────┘                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The traits are async because the database implementation is; the
//! in-memory fake resolves immediately.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::types::{Booking, BookingStatus, TimeOff, WeeklySchedule};

/// Access to barbers, weekly schedules and time-off.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Whether the barber exists at all (drives NotFound).
    async fn barber_exists(&self, barber_id: &str) -> StoreResult<bool>;

    /// The barber's schedule for one weekday (0 = Sunday), if any.
    async fn weekly_entry(
        &self,
        barber_id: &str,
        day_of_week: u8,
    ) -> StoreResult<Option<WeeklySchedule>>;

    /// A time-off period with `start_date <= date <= end_date`, if any.
    /// When several overlap, which one is returned is unspecified.
    async fn time_off_covering(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<TimeOff>>;
}

/// Access to existing bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Bookings for the barber on `date` whose status is in `statuses`,
    /// ordered by start time ascending.
    async fn list_bookings(
        &self,
        barber_id: &str,
        date: NaiveDate,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>>;
}
