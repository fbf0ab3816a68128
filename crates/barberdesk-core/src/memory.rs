//! # In-Memory Store
//!
//! A [`ScheduleStore`] + [`BookingStore`] backed by plain collections. Used
//! by tests and anywhere the engine should run without a database.
//!
//! Cloning is cheap and clones share the same data, so one store can be
//! handed to the engine as both the schedule and the booking side.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{StoreError, StoreResult};
use crate::store::{BookingStore, ScheduleStore};
use crate::types::{Booking, BookingStatus, TimeOff, WeeklySchedule};

#[derive(Debug, Default)]
struct Inner {
    barbers: HashSet<String>,
    /// Keyed by (barber_id, day_of_week).
    weekly: HashMap<(String, u8), WeeklySchedule>,
    time_off: Vec<TimeOff>,
    bookings: Vec<Booking>,
    /// Dates on which every read fails, for exercising error paths.
    failing_dates: HashSet<NaiveDate>,
}

/// Shared in-memory schedule and booking data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the maps half-updated
    // (every mutation is a single insert/retain), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_barber(&self, barber_id: impl Into<String>) {
        self.write().barbers.insert(barber_id.into());
    }

    /// Replaces the barber's whole week with `entries`.
    pub fn set_week(&self, barber_id: &str, entries: Vec<WeeklySchedule>) {
        let mut inner = self.write();
        inner.weekly.retain(|(id, _), _| id != barber_id);
        for entry in entries {
            inner
                .weekly
                .insert((entry.barber_id.clone(), entry.day_of_week), entry);
        }
    }

    pub fn add_time_off(&self, period: TimeOff) {
        self.write().time_off.push(period);
    }

    /// Removes a time-off period, returning whether it existed.
    pub fn remove_time_off(&self, id: &str) -> bool {
        let mut inner = self.write();
        let before = inner.time_off.len();
        inner.time_off.retain(|p| p.id != id);
        inner.time_off.len() != before
    }

    pub fn add_booking(&self, booking: Booking) {
        self.write().bookings.push(booking);
    }

    /// Changes a booking's status, returning whether it existed.
    pub fn set_booking_status(&self, id: &str, status: BookingStatus) -> bool {
        let mut inner = self.write();
        match inner.bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = status;
                true
            }
            None => false,
        }
    }

    /// Makes every read touching `date` fail with a [`StoreError`].
    pub fn fail_reads_on(&self, date: NaiveDate) {
        self.write().failing_dates.insert(date);
    }

    fn check_date(inner: &Inner, date: NaiveDate) -> StoreResult<()> {
        if inner.failing_dates.contains(&date) {
            return Err(StoreError::new(format!("simulated read failure on {}", date)));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn barber_exists(&self, barber_id: &str) -> StoreResult<bool> {
        Ok(self.read().barbers.contains(barber_id))
    }

    async fn weekly_entry(
        &self,
        barber_id: &str,
        day_of_week: u8,
    ) -> StoreResult<Option<WeeklySchedule>> {
        let inner = self.read();
        Ok(inner
            .weekly
            .get(&(barber_id.to_string(), day_of_week))
            .cloned())
    }

    async fn time_off_covering(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<TimeOff>> {
        let inner = self.read();
        Self::check_date(&inner, date)?;
        Ok(inner
            .time_off
            .iter()
            .find(|p| p.barber_id == barber_id && p.covers(date))
            .cloned())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn list_bookings(
        &self,
        barber_id: &str,
        date: NaiveDate,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>> {
        let inner = self.read();
        Self::check_date(&inner, date)?;

        let mut bookings: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| b.barber_id == barber_id && b.date == date && statuses.contains(&b.status))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start_time);

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
    }

    fn booking(id: &str, start: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            barber_id: "b1".to_string(),
            customer_id: "c1".to_string(),
            customer_name: None,
            customer_mobile: None,
            date: date(),
            start_time: TimeOfDay::parse(start).unwrap(),
            duration_minutes: 30,
            status,
        }
    }

    #[tokio::test]
    async fn test_list_bookings_sorted_and_filtered() {
        let store = InMemoryStore::new();
        store.add_booking(booking("late", "15:00", BookingStatus::Scheduled));
        store.add_booking(booking("early", "09:00", BookingStatus::Confirmed));
        store.add_booking(booking("gone", "10:00", BookingStatus::Cancelled));

        let active = store
            .list_bookings("b1", date(), &BookingStatus::ACTIVE)
            .await
            .unwrap();
        let ids: Vec<&str> = active.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store.add_barber("b1");
        assert!(other.barber_exists("b1").await.unwrap());
    }

    #[tokio::test]
    async fn test_status_change_and_failure_injection() {
        let store = InMemoryStore::new();
        store.add_booking(booking("x", "09:00", BookingStatus::Scheduled));
        assert!(store.set_booking_status("x", BookingStatus::Cancelled));
        assert!(!store.set_booking_status("missing", BookingStatus::Cancelled));

        store.fail_reads_on(date());
        assert!(store.list_bookings("b1", date(), &BookingStatus::ACTIVE).await.is_err());
    }
}
