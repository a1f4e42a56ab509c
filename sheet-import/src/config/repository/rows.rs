//! Repository for imported rows

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::import::{InsertOutcome, RowStore, StoreError, StoredRow};

/// Row store backed by the `rows` table. Uniqueness is enforced by the
/// table's `UNIQUE` id column, so every write is a single statement.
#[derive(Debug, Clone)]
pub struct SqliteRowStore {
    pool: SqlitePool,
}

impl SqliteRowStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rows WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn create(&self, row: &StoredRow) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO rows (id, name, date) VALUES (?, ?, ?)")
            .bind(&row.id)
            .bind(&row.name)
            .bind(row.date)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict { id: row.id.clone() }),
            Err(err) => Err(err.into()),
        }
    }

    async fn insert_if_absent(&self, row: &StoredRow) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            "INSERT INTO rows (id, name, date) VALUES (?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(row.date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Created)
        }
    }

    async fn list(&self) -> Result<Vec<StoredRow>, StoreError> {
        let rows = sqlx::query("SELECT id, name, date FROM rows ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            stored.push(StoredRow {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                date: row.try_get::<Option<NaiveDate>, _>("date")?,
            });
        }
        Ok(stored)
    }
}
