//! SQLite-backed durable session storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::session::TokenStore;

/// Key of the only row in the `session` table.
const SLOT: &str = "default";

/// Token store persisting the session in `session.db`.
///
/// Cheap to clone; the connection pool is opened lazily on first use.
#[derive(Debug, Clone)]
pub struct SqliteTokenStore {
    path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the pool, initializing if necessary.
    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open session database at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session (
                slot       TEXT PRIMARY KEY,
                token      TEXT NOT NULL,
                stored_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create session table")?;

        tracing::debug!(path = ?self.path, "session database ready");
        *guard = Some(pool.clone());
        Ok(pool)
    }
}

impl TokenStore for SqliteTokenStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        let pool = self.pool().await?;

        let row = sqlx::query(
            r#"
            SELECT token
            FROM session
            WHERE slot = ?1
            "#,
        )
        .bind(SLOT)
        .fetch_optional(&pool)
        .await
        .context("failed to read session token")?;

        let token = match row {
            Some(row) => Some(
                row.try_get::<String, _>("token")
                    .context("invalid token column in session table")?,
            ),
            None => None,
        };
        Ok(token)
    }

    async fn save(&self, token: &str) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO session (slot, token, stored_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot)
            DO UPDATE SET
                token = excluded.token,
                stored_at = excluded.stored_at
            "#,
        )
        .bind(SLOT)
        .bind(token)
        .bind(&now)
        .execute(&pool)
        .await
        .context("failed to store session token")?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            DELETE FROM session
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to clear session token")?;

        Ok(())
    }
}
