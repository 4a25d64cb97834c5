//! Networked backend built on Postgres via sqlx.
//!
//! Every mutation is a single SQL statement; Postgres row locks serialize
//! concurrent updates of the same paste.

use super::{Backend, PasteStore, ViewOutcome, MAX_ID_ATTEMPTS};
use crate::clock::now_millis;
use crate::error::AppError;
use crate::ids::generate_id;
use crate::models::paste::{NewPaste, Paste};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS pastes (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    created_at BIGINT NOT NULL,
    ttl_seconds BIGINT,
    max_views BIGINT,
    current_views BIGINT NOT NULL DEFAULT 0
)
"#;

const PASTE_COLUMNS: &str = "id, content, created_at, ttl_seconds, max_views, current_views";

/// Accessor for the Postgres `pastes` table.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect a pool and make sure the schema exists.
    ///
    /// # Errors
    /// Returns [`AppError::StorageUnavailable`] when the server cannot be
    /// reached, or a Postgres error when schema creation fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        tracing::info!(max_connections, "Connecting to Postgres...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect(url)
            .await
            .map_err(|err| {
                AppError::StorageUnavailable(format!("Failed to connect to Postgres: {}", err))
            })?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if it does not exist.
    ///
    /// # Errors
    /// Returns an error when schema creation fails.
    pub async fn from_pool(pool: PgPool) -> Result<Self, AppError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PasteStore for PostgresStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    #[tracing::instrument(skip(self, new), fields(db.system = "postgresql", db.operation = "insert"))]
    async fn create(&self, new: NewPaste) -> Result<String, AppError> {
        let created_at = now_millis();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_id();
            let result = sqlx::query(
                r#"
                INSERT INTO pastes (id, content, created_at, ttl_seconds, max_views, current_views)
                VALUES ($1, $2, $3, $4, $5, 0)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&id)
            .bind(&new.content)
            .bind(created_at)
            .bind(new.ttl_seconds)
            .bind(new.max_views)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(id);
            }
            tracing::warn!(%id, "Paste id collision; regenerating");
        }
        tracing::error!("Failed to generate an unused paste id");
        Err(AppError::Internal)
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.operation = "select"))]
    async fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let paste = sqlx::query_as::<_, Paste>(&format!(
            "SELECT {} FROM pastes WHERE id = $1",
            PASTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(paste)
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.operation = "update"))]
    async fn increment_views(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE pastes SET current_views = current_views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.operation = "update"))]
    async fn record_view(&self, id: &str, now_ms: i64) -> Result<ViewOutcome, AppError> {
        let updated = sqlx::query_as::<_, Paste>(&format!(
            r#"
            UPDATE pastes
            SET current_views = current_views + 1
            WHERE id = $1
              AND (max_views IS NULL OR current_views < max_views)
              AND (ttl_seconds IS NULL OR $2 < created_at + ttl_seconds * 1000)
            RETURNING {}
            "#,
            PASTE_COLUMNS
        ))
        .bind(id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(paste) = updated {
            return Ok(ViewOutcome::Recorded(paste));
        }

        // The guarded update matched nothing: either the row is gone or one of
        // the limits is hit. Re-read only to tell those apart for logging.
        Ok(match self.get(id).await? {
            None => ViewOutcome::Missing,
            Some(paste) => match paste.availability(now_ms).reason() {
                Some(reason) => ViewOutcome::Unavailable(reason),
                None => ViewOutcome::Missing,
            },
        })
    }
}
