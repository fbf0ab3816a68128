//! # Barber Repository
//!
//! Barbers are only created and looked up here; the engine asks
//! [`BarberRepository::exists`] (through the schedule store) to decide
//! NotFound.

use barberdesk_core::Barber;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

#[derive(Debug, Clone, sqlx::FromRow)]
struct BarberRow {
    id: String,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<BarberRow> for Barber {
    fn from(row: BarberRow) -> Self {
        Barber {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Repository for barber database operations.
#[derive(Debug, Clone)]
pub struct BarberRepository {
    pool: SqlitePool,
}

impl BarberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BarberRepository { pool }
    }

    /// Inserts a fully-formed barber.
    pub async fn insert(&self, barber: &Barber) -> DbResult<()> {
        debug!(id = %barber.id, name = %barber.name, "Inserting barber");

        sqlx::query(
            r#"
            INSERT INTO barbers (id, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&barber.id)
        .bind(&barber.name)
        .bind(barber.is_active)
        .bind(barber.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Creates an active barber with a fresh id.
    pub async fn create(&self, name: &str) -> DbResult<Barber> {
        let barber = Barber {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.insert(&barber).await?;
        Ok(barber)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Barber>> {
        let row: Option<BarberRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active, created_at
            FROM barbers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Barber::from))
    }

    /// Active barbers, by name.
    pub async fn list_active(&self) -> DbResult<Vec<Barber>> {
        let rows: Vec<BarberRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active, created_at
            FROM barbers
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Barber::from).collect())
    }

    /// Whether a barber with this id exists, active or not.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM barbers WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM barbers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_create_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.barbers();

        let barber = repo.create("Marco").await.unwrap();
        let fetched = repo.get_by_id(&barber.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Marco");
        assert!(fetched.is_active);
        assert!(repo.exists(&barber.id).await.unwrap());
        assert!(!repo.exists("missing").await.unwrap());
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.barbers();

        repo.create("Zed").await.unwrap();
        repo.create("Ana").await.unwrap();
        repo.insert(&Barber {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Retired".to_string(),
            is_active: false,
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap();

        let names: Vec<String> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["Ana", "Zed"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
