//! # Booking Repository
//!
//! Bookings, the conflict gate and the [`BookingStore`] the availability
//! engine reads.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create(new) → Booking { status: Scheduled | Confirmed }        │
//! │         BEGIN                                                           │
//! │         ├── lock barber row (write lock taken before reading)          │
//! │         ├── read active bookings for (barber, date)                    │
//! │         ├── overlap?  → ROLLBACK, DbError::BookingConflict             │
//! │         └── INSERT                                                      │
//! │         COMMIT                                                          │
//! │                                                                         │
//! │  2. PROGRESS                                                           │
//! │     └── update_status(id, Confirmed | Completed)                       │
//! │                                                                         │
//! │  3. (OPTIONAL) CANCEL                                                  │
//! │     └── update_status(id, Cancelled) → slot is free again              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completed and cancelled are terminal. Any other change fails with
//! [`DbError::InvalidTransition`].

use async_trait::async_trait;
use barberdesk_core::conflict::find_conflict;
use barberdesk_core::error::StoreResult;
use barberdesk_core::store::BookingStore;
use barberdesk_core::validation::{validate_booking_duration, validate_new_booking};
use barberdesk_core::{Booking, BookingStatus, NewBooking, TimeOfDay, MAX_BOOKING_DURATION_MINUTES};
use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{decode_date, decode_time, encode_date, transaction_failed};
use crate::error::{DbError, DbResult};

// =============================================================================
// Rows
// =============================================================================

const SELECT_BOOKING: &str = r#"
    SELECT
        b.id,
        b.barber_id,
        b.customer_id,
        c.name   AS customer_name,
        c.mobile AS customer_mobile,
        b.booking_date,
        b.start_time,
        b.duration_minutes,
        b.status
    FROM bookings b
    LEFT JOIN customers c ON c.id = b.customer_id
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
struct BookingRow {
    id: String,
    barber_id: String,
    customer_id: String,
    customer_name: Option<String>,
    customer_mobile: Option<String>,
    booking_date: String,
    start_time: String,
    duration_minutes: i64,
    status: BookingStatus,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DbError;

    fn try_from(row: BookingRow) -> DbResult<Self> {
        let duration_minutes = u32::try_from(row.duration_minutes)
            .ok()
            .filter(|d| (1..=MAX_BOOKING_DURATION_MINUTES).contains(d))
            .ok_or_else(|| {
                DbError::corrupt(
                    "bookings",
                    &row.id,
                    format!("duration {} out of range", row.duration_minutes),
                )
            })?;

        Ok(Booking {
            date: decode_date("bookings", &row.id, &row.booking_date)?,
            start_time: decode_time("bookings", &row.id, &row.start_time)?,
            duration_minutes,
            id: row.id,
            barber_id: row.barber_id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            customer_mobile: row.customer_mobile,
            status: row.status,
        })
    }
}

async fn fetch_by_id(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Booking>> {
    let sql = format!("{SELECT_BOOKING} WHERE b.id = ?1");
    let row: Option<BookingRow> = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
    row.map(Booking::try_from).transpose()
}

/// Every booking for (barber, date) in the given statuses, by start time.
async fn fetch_for_date(
    conn: &mut SqliteConnection,
    barber_id: &str,
    date: NaiveDate,
    statuses: &[BookingStatus],
) -> DbResult<Vec<Booking>> {
    let sql = format!(
        "{SELECT_BOOKING} WHERE b.barber_id = ?1 AND b.booking_date = ?2 \
         ORDER BY b.start_time, b.id"
    );
    let rows: Vec<BookingRow> = sqlx::query_as(&sql)
        .bind(barber_id)
        .bind(encode_date(date))
        .fetch_all(conn)
        .await?;

    rows.into_iter()
        .filter(|row| statuses.contains(&row.status))
        .map(Booking::try_from)
        .collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Creates a booking if its interval is free.
    ///
    /// The overlap check and the insert share one transaction, and the
    /// barber row is written first so SQLite hands out the write lock
    /// before anything is read. Two concurrent requests for the same
    /// interval cannot both succeed.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] - bad ids, duration, or inactive status
    /// - [`DbError::NotFound`] - unknown barber
    /// - [`DbError::BookingConflict`] - overlaps an active booking
    /// - [`DbError::ForeignKeyViolation`] - unknown customer
    pub async fn create(&self, new: &NewBooking) -> DbResult<Booking> {
        validate_new_booking(new)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let locked = sqlx::query("UPDATE barbers SET is_active = is_active WHERE id = ?1")
            .bind(&new.barber_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if locked == 0 {
            return Err(DbError::not_found("Barber", &new.barber_id));
        }

        let active = fetch_for_date(&mut tx, &new.barber_id, new.date, &BookingStatus::ACTIVE).await?;
        if let Some(existing) = find_conflict(&active, new.start_time, new.duration_minutes, None) {
            debug!(
                barber_id = %new.barber_id,
                date = %new.date,
                time = %new.start_time,
                existing = %existing.id,
                "Booking rejected: conflict"
            );
            return Err(DbError::BookingConflict {
                existing_id: existing.id.clone(),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, barber_id, customer_id,
                booking_date, start_time, duration_minutes,
                status, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&id)
        .bind(&new.barber_id)
        .bind(&new.customer_id)
        .bind(encode_date(new.date))
        .bind(new.start_time.to_string())
        .bind(i64::from(new.duration_minutes))
        .bind(new.status)
        .bind(&new.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let booking = fetch_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("booking {} vanished after insert", id)))?;

        tx.commit().await.map_err(transaction_failed)?;

        info!(
            id = %booking.id,
            barber_id = %booking.barber_id,
            date = %booking.date,
            time = %booking.start_time,
            duration = booking.duration_minutes,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Bookings for (barber, date) whose status is in `statuses`, by start
    /// time.
    pub async fn list_for_date(
        &self,
        barber_id: &str,
        date: NaiveDate,
        statuses: &[BookingStatus],
    ) -> DbResult<Vec<Booking>> {
        let mut conn = self.pool.acquire().await?;
        let bookings = fetch_for_date(&mut conn, barber_id, date, statuses).await?;
        debug!(barber_id, %date, count = bookings.len(), "Listed bookings");
        Ok(bookings)
    }

    /// Moves a booking along its lifecycle.
    pub async fn update_status(&self, id: &str, next: BookingStatus) -> DbResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let current = fetch_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))?;

        if !current.status.can_transition_to(next) {
            return Err(DbError::invalid_transition(id, current.status, next));
        }

        sqlx::query("UPDATE bookings SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(next)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(transaction_failed)?;

        debug!(id, from = current.status.as_str(), to = next.as_str(), "Booking status changed");
        Ok(Booking {
            status: next,
            ..current
        })
    }

    /// Whether `[time, time + duration)` overlaps an active booking other
    /// than `exclude_booking_id`. Read-only; use [`Self::create`] to insert.
    pub async fn has_conflict(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: TimeOfDay,
        duration: u32,
        exclude_booking_id: Option<&str>,
    ) -> DbResult<bool> {
        validate_booking_duration(duration)?;
        let active = self
            .list_for_date(barber_id, date, &BookingStatus::ACTIVE)
            .await?;
        Ok(find_conflict(&active, time, duration, exclude_booking_id).is_some())
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn list_bookings(
        &self,
        barber_id: &str,
        date: NaiveDate,
        statuses: &[BookingStatus],
    ) -> StoreResult<Vec<Booking>> {
        Ok(self.list_for_date(barber_id, date, statuses).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
    }

    struct Fixture {
        db: Database,
        barber_id: String,
        customer_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let barber = db.barbers().create("Marco").await.unwrap();
        let customer = db.customers().create("Dana", Some("555-0101")).await.unwrap();
        Fixture {
            db,
            barber_id: barber.id,
            customer_id: customer.id,
        }
    }

    impl Fixture {
        fn new_booking(&self, start: &str, minutes: u32) -> NewBooking {
            NewBooking {
                barber_id: self.barber_id.clone(),
                customer_id: self.customer_id.clone(),
                date: day(),
                start_time: t(start),
                duration_minutes: minutes,
                status: BookingStatus::Scheduled,
                notes: None,
            }
        }
    }

    #[tokio::test]
    async fn test_create_joins_customer() {
        let f = fixture().await;
        let booking = f.db.bookings().create(&f.new_booking("10:00", 60)).await.unwrap();

        assert_eq!(booking.customer_name.as_deref(), Some("Dana"));
        assert_eq!(booking.customer_mobile.as_deref(), Some("555-0101"));
        assert_eq!(booking.status, BookingStatus::Scheduled);

        let fetched = f.db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(fetched, booking);
    }

    #[tokio::test]
    async fn test_create_rejects_overlap_allows_adjacent() {
        let f = fixture().await;
        let repo = f.db.bookings();
        let first = repo.create(&f.new_booking("10:00", 60)).await.unwrap();

        let err = repo.create(&f.new_booking("10:30", 30)).await.unwrap_err();
        assert!(matches!(err, DbError::BookingConflict { existing_id } if existing_id == first.id));

        repo.create(&f.new_booking("09:30", 30)).await.unwrap();
        repo.create(&f.new_booking("11:00", 30)).await.unwrap();

        let active = repo
            .list_for_date(&f.barber_id, day(), &BookingStatus::ACTIVE)
            .await
            .unwrap();
        let times: Vec<String> = active.iter().map(|b| b.start_time.to_string()).collect();
        assert_eq!(times, ["09:30", "10:00", "11:00"]);
    }

    #[tokio::test]
    async fn test_cancelled_booking_frees_interval() {
        let f = fixture().await;
        let repo = f.db.bookings();
        let first = repo.create(&f.new_booking("10:00", 60)).await.unwrap();

        assert!(repo
            .has_conflict(&f.barber_id, day(), t("10:15"), 30, None)
            .await
            .unwrap());

        repo.update_status(&first.id, BookingStatus::Cancelled).await.unwrap();

        assert!(!repo
            .has_conflict(&f.barber_id, day(), t("10:15"), 30, None)
            .await
            .unwrap());
        repo.create(&f.new_booking("10:15", 30)).await.unwrap();
    }

    #[tokio::test]
    async fn test_has_conflict_excludes_booking() {
        let f = fixture().await;
        let repo = f.db.bookings();
        let mine = repo.create(&f.new_booking("10:00", 30)).await.unwrap();

        assert!(!repo
            .has_conflict(&f.barber_id, day(), t("10:00"), 45, Some(&mine.id))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let f = fixture().await;
        let repo = f.db.bookings();
        let booking = repo.create(&f.new_booking("10:00", 30)).await.unwrap();

        let confirmed = repo.update_status(&booking.id, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        repo.update_status(&booking.id, BookingStatus::Completed).await.unwrap();

        let err = repo
            .update_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidTransition { .. }));

        let missing = repo.update_status("nope", BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_validation_and_missing_refs() {
        let f = fixture().await;
        let repo = f.db.bookings();

        let mut cancelled = f.new_booking("10:00", 30);
        cancelled.status = BookingStatus::Cancelled;
        assert!(matches!(repo.create(&cancelled).await, Err(DbError::Validation(_))));

        let mut ghost_barber = f.new_booking("10:00", 30);
        ghost_barber.barber_id = Uuid::new_v4().to_string();
        assert!(matches!(repo.create(&ghost_barber).await, Err(DbError::NotFound { .. })));

        let mut ghost_customer = f.new_booking("10:00", 30);
        ghost_customer.customer_id = Uuid::new_v4().to_string();
        assert!(matches!(
            repo.create(&ghost_customer).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[test]
    fn test_out_of_range_duration_is_corrupt_row() {
        let row = |minutes: i64| BookingRow {
            id: "bk1".to_string(),
            barber_id: "b1".to_string(),
            customer_id: "c1".to_string(),
            customer_name: None,
            customer_mobile: None,
            booking_date: "2026-03-16".to_string(),
            start_time: "10:00".to_string(),
            duration_minutes: minutes,
            status: BookingStatus::Confirmed,
        };

        for minutes in [0, -5, 481, i64::from(u32::MAX), i64::MAX] {
            let err = Booking::try_from(row(minutes)).unwrap_err();
            assert!(matches!(err, DbError::CorruptRow { table: "bookings", .. }));
        }
        assert_eq!(Booking::try_from(row(480)).unwrap().duration_minutes, 480);
    }

    #[tokio::test]
    async fn test_schema_rejects_oversized_duration() {
        let f = fixture().await;

        let result = sqlx::query(
            r#"
            INSERT INTO bookings (
                id, barber_id, customer_id,
                booking_date, start_time, duration_minutes,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, '2026-03-16', '10:00', ?4, 'confirmed', ?5, ?5)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&f.barber_id)
        .bind(&f.customer_id)
        .bind(i64::from(u32::MAX))
        .bind(Utc::now())
        .execute(f.db.pool())
        .await;

        assert!(result.is_err());
        assert!(f
            .db
            .bookings()
            .list_for_date(&f.barber_id, day(), &BookingStatus::ACTIVE)
            .await
            .unwrap()
            .is_empty());
    }
}
