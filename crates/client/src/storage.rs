//! SQLite-backed durable session storage.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use stockpad_auth::{SessionStorage, StorageError, StorageWrite};

/// Key/value table standing in for browser local storage.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to create SQLite pool for session storage at {:?}", path))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. One pinned connection, so the data lives as
    /// long as this handle.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory SQLite URL")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .context("failed to create in-memory SQLite pool")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create local_storage table")?;

        Ok(Self { pool })
    }
}

fn backend(err: sqlx::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl SessionStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM local_storage
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => Ok(Some(row.try_get("value").map_err(backend)?)),
            None => Ok(None),
        }
    }

    async fn apply(&self, writes: Vec<StorageWrite>) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let now = Utc::now().to_rfc3339();

        for write in writes {
            match write {
                StorageWrite::Set { key, value } => {
                    sqlx::query(
                        r#"
                        INSERT INTO local_storage (key, value, updated_at)
                        VALUES (?1, ?2, ?3)
                        ON CONFLICT(key)
                        DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at
                        "#,
                    )
                    .bind(key)
                    .bind(&value)
                    .bind(&now)
                    .execute(&mut *tx)
                    .await
                    .map_err(backend)?;
                }
                StorageWrite::Remove { key } => {
                    sqlx::query(
                        r#"
                        DELETE FROM local_storage
                        WHERE key = ?1
                        "#,
                    )
                    .bind(key)
                    .execute(&mut *tx)
                    .await
                    .map_err(backend)?;
                }
            }
        }

        tx.commit().await.map_err(backend)
    }
}
