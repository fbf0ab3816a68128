//! # Schedule Repository
//!
//! Weekly working hours and time-off, and the [`ScheduleStore`] the
//! availability engine reads.
//!
//! ## Weekly Replacement
//! ```text
//! replace_week(barber, entries)
//!   │
//!   ├── validate every entry, no duplicate weekday   ✗ → DbError::Validation
//!   │
//!   BEGIN
//!   ├── barber exists?                               ✗ → DbError::NotFound
//!   ├── DELETE FROM weekly_schedules WHERE barber_id = ?
//!   ├── INSERT entry × N
//!   COMMIT
//! ```
//! A week is never partially updated: readers see the old week or the new
//! one.

use async_trait::async_trait;
use barberdesk_core::error::StoreResult;
use barberdesk_core::store::ScheduleStore;
use barberdesk_core::validation::{validate_time_off, validate_week};
use barberdesk_core::{TimeOff, WeeklySchedule};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decode_date, decode_optional_time, decode_time, encode_date, transaction_failed};
use crate::error::{DbError, DbResult};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct WeeklyRow {
    barber_id: String,
    day_of_week: i64,
    is_working: bool,
    start_time: String,
    end_time: String,
    break_start: Option<String>,
    break_end: Option<String>,
}

impl TryFrom<WeeklyRow> for WeeklySchedule {
    type Error = DbError;

    fn try_from(row: WeeklyRow) -> DbResult<Self> {
        let key = format!("{}/{}", row.barber_id, row.day_of_week);
        let day_of_week = u8::try_from(row.day_of_week)
            .ok()
            .filter(|d| *d <= 6)
            .ok_or_else(|| DbError::corrupt("weekly_schedules", &key, "day_of_week out of range"))?;

        Ok(WeeklySchedule {
            day_of_week,
            is_working: row.is_working,
            start_time: decode_time("weekly_schedules", &key, &row.start_time)?,
            end_time: decode_time("weekly_schedules", &key, &row.end_time)?,
            break_start: decode_optional_time("weekly_schedules", &key, row.break_start.as_deref())?,
            break_end: decode_optional_time("weekly_schedules", &key, row.break_end.as_deref())?,
            barber_id: row.barber_id,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TimeOffRow {
    id: String,
    barber_id: String,
    start_date: String,
    end_date: String,
    reason: String,
    notes: Option<String>,
}

impl TryFrom<TimeOffRow> for TimeOff {
    type Error = DbError;

    fn try_from(row: TimeOffRow) -> DbResult<Self> {
        Ok(TimeOff {
            start_date: decode_date("time_off", &row.id, &row.start_date)?,
            end_date: decode_date("time_off", &row.id, &row.end_date)?,
            id: row.id,
            barber_id: row.barber_id,
            reason: row.reason,
            notes: row.notes,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for weekly schedules and time-off.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ScheduleRepository { pool }
    }

    /// Replaces the barber's whole week in one transaction.
    pub async fn replace_week(&self, barber_id: &str, entries: &[WeeklySchedule]) -> DbResult<()> {
        validate_week(barber_id, entries)?;

        let mut tx = self.pool.begin().await.map_err(transaction_failed)?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM barbers WHERE id = ?1)")
            .bind(barber_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(DbError::not_found("Barber", barber_id));
        }

        let removed = sqlx::query("DELETE FROM weekly_schedules WHERE barber_id = ?1")
            .bind(barber_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO weekly_schedules (
                    barber_id, day_of_week, is_working,
                    start_time, end_time, break_start, break_end
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&entry.barber_id)
            .bind(i64::from(entry.day_of_week))
            .bind(entry.is_working)
            .bind(entry.start_time.to_string())
            .bind(entry.end_time.to_string())
            .bind(entry.break_start.map(|t| t.to_string()))
            .bind(entry.break_end.map(|t| t.to_string()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.map_err(transaction_failed)?;

        debug!(barber_id, removed, inserted = entries.len(), "Replaced weekly schedule");
        Ok(())
    }

    /// The barber's week ordered Sunday first.
    pub async fn get_week(&self, barber_id: &str) -> DbResult<Vec<WeeklySchedule>> {
        let rows: Vec<WeeklyRow> = sqlx::query_as(
            r#"
            SELECT barber_id, day_of_week, is_working,
                   start_time, end_time, break_start, break_end
            FROM weekly_schedules
            WHERE barber_id = ?1
            ORDER BY day_of_week
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WeeklySchedule::try_from).collect()
    }

    pub async fn weekly_entry(
        &self,
        barber_id: &str,
        day_of_week: u8,
    ) -> DbResult<Option<WeeklySchedule>> {
        let row: Option<WeeklyRow> = sqlx::query_as(
            r#"
            SELECT barber_id, day_of_week, is_working,
                   start_time, end_time, break_start, break_end
            FROM weekly_schedules
            WHERE barber_id = ?1 AND day_of_week = ?2
            "#,
        )
        .bind(barber_id)
        .bind(i64::from(day_of_week))
        .fetch_optional(&self.pool)
        .await?;

        row.map(WeeklySchedule::try_from).transpose()
    }

    /// Records a time-off period after validating its dates.
    pub async fn add_time_off(&self, period: &TimeOff) -> DbResult<()> {
        validate_time_off(period)?;

        debug!(
            id = %period.id,
            barber_id = %period.barber_id,
            start = %period.start_date,
            end = %period.end_date,
            "Adding time off"
        );

        sqlx::query(
            r#"
            INSERT INTO time_off (
                id, barber_id, start_date, end_date, reason, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&period.id)
        .bind(&period.barber_id)
        .bind(encode_date(period.start_date))
        .bind(encode_date(period.end_date))
        .bind(&period.reason)
        .bind(&period.notes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_time_off(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM time_off WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TimeOff", id));
        }

        debug!(id, "Deleted time off");
        Ok(())
    }

    /// All periods for a barber, earliest first.
    pub async fn list_time_off(&self, barber_id: &str) -> DbResult<Vec<TimeOff>> {
        let rows: Vec<TimeOffRow> = sqlx::query_as(
            r#"
            SELECT id, barber_id, start_date, end_date, reason, notes
            FROM time_off
            WHERE barber_id = ?1
            ORDER BY start_date, end_date
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TimeOff::try_from).collect()
    }

    /// The earliest-starting period covering `date`, if any.
    pub async fn time_off_covering(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> DbResult<Option<TimeOff>> {
        let day = encode_date(date);
        let row: Option<TimeOffRow> = sqlx::query_as(
            r#"
            SELECT id, barber_id, start_date, end_date, reason, notes
            FROM time_off
            WHERE barber_id = ?1 AND start_date <= ?2 AND end_date >= ?2
            ORDER BY start_date
            LIMIT 1
            "#,
        )
        .bind(barber_id)
        .bind(&day)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TimeOff::try_from).transpose()
    }

    pub async fn barber_exists(&self, barber_id: &str) -> DbResult<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM barbers WHERE id = ?1)")
            .bind(barber_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn barber_exists(&self, barber_id: &str) -> StoreResult<bool> {
        Ok(ScheduleRepository::barber_exists(self, barber_id).await?)
    }

    async fn weekly_entry(
        &self,
        barber_id: &str,
        day_of_week: u8,
    ) -> StoreResult<Option<WeeklySchedule>> {
        Ok(ScheduleRepository::weekly_entry(self, barber_id, day_of_week).await?)
    }

    async fn time_off_covering(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<TimeOff>> {
        Ok(ScheduleRepository::time_off_covering(self, barber_id, date).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use barberdesk_core::TimeOfDay;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn entry(barber_id: &str, dow: u8) -> WeeklySchedule {
        WeeklySchedule {
            barber_id: barber_id.to_string(),
            day_of_week: dow,
            is_working: true,
            start_time: t("09:00"),
            end_time: t("17:00"),
            break_start: Some(t("12:00")),
            break_end: Some(t("12:30")),
        }
    }

    fn off(id: &str, barber_id: &str, start: u32, end: u32, reason: &str) -> TimeOff {
        TimeOff {
            id: id.to_string(),
            barber_id: barber_id.to_string(),
            start_date: d(start),
            end_date: d(end),
            reason: reason.to_string(),
            notes: None,
        }
    }

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let barber = db.barbers().create("Marco").await.unwrap();
        (db, barber.id)
    }

    #[tokio::test]
    async fn test_replace_week_round_trip() {
        let (db, id) = setup().await;
        let repo = db.schedules();

        repo.replace_week(&id, &[entry(&id, 3), entry(&id, 1)]).await.unwrap();
        let week = repo.get_week(&id).await.unwrap();
        assert_eq!(week.iter().map(|e| e.day_of_week).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(week[0].break_window(), Some((t("12:00"), t("12:30"))));

        // Replacing drops the old rows entirely
        repo.replace_week(&id, &[entry(&id, 5)]).await.unwrap();
        let week = repo.get_week(&id).await.unwrap();
        assert_eq!(week.len(), 1);
        assert!(repo.weekly_entry(&id, 1).await.unwrap().is_none());
        assert!(repo.weekly_entry(&id, 5).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_week_rejects_bad_input_without_touching_rows() {
        let (db, id) = setup().await;
        let repo = db.schedules();
        repo.replace_week(&id, &[entry(&id, 1)]).await.unwrap();

        let mut bad = entry(&id, 2);
        bad.end_time = t("08:00");
        let err = repo.replace_week(&id, &[entry(&id, 1), bad]).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let dup = repo.replace_week(&id, &[entry(&id, 1), entry(&id, 1)]).await;
        assert!(matches!(dup, Err(DbError::Validation(_))));

        assert_eq!(repo.get_week(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_week_unknown_barber() {
        let (db, _) = setup().await;
        let err = db
            .schedules()
            .replace_week("ghost", &[entry("ghost", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_time_off_covering_is_inclusive() {
        let (db, id) = setup().await;
        let repo = db.schedules();
        repo.add_time_off(&off("v1", &id, 1, 3, "Vacation")).await.unwrap();

        assert_eq!(
            repo.time_off_covering(&id, d(1)).await.unwrap().map(|p| p.reason),
            Some("Vacation".to_string())
        );
        assert!(repo.time_off_covering(&id, d(3)).await.unwrap().is_some());
        assert!(repo.time_off_covering(&id, d(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overlapping_periods_and_delete() {
        let (db, id) = setup().await;
        let repo = db.schedules();
        repo.add_time_off(&off("a", &id, 1, 10, "Vacation")).await.unwrap();
        repo.add_time_off(&off("b", &id, 5, 6, "Training")).await.unwrap();

        assert_eq!(repo.list_time_off(&id).await.unwrap().len(), 2);

        repo.delete_time_off("a").await.unwrap();
        let covering = repo.time_off_covering(&id, d(5)).await.unwrap().unwrap();
        assert_eq!(covering.id, "b");
        assert!(repo.time_off_covering(&id, d(2)).await.unwrap().is_none());

        let err = repo.delete_time_off("a").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reversed_time_off_rejected() {
        let (db, id) = setup().await;
        let err = db
            .schedules()
            .add_time_off(&off("x", &id, 5, 1, "Oops"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_trait_reads() {
        let (db, id) = setup().await;
        let repo = db.schedules();
        repo.replace_week(&id, &[entry(&id, 1)]).await.unwrap();

        let store: &dyn ScheduleStore = &repo;
        assert!(store.barber_exists(&id).await.unwrap());
        assert!(!store.barber_exists("ghost").await.unwrap());
        assert!(store.weekly_entry(&id, 1).await.unwrap().is_some());
    }
}
