//! PostgreSQL session store implementation
//!
//! Expects the following table; the primary key on `user_id` backs up the
//! one-session-per-user precondition enforced in the lifecycle manager:
//!
//! ```sql
//! CREATE TABLE sessions (
//!     user_id        TEXT PRIMARY KEY,
//!     refresh_digest TEXT NOT NULL,
//!     user_agent     TEXT NOT NULL,
//!     source_ip      TEXT NOT NULL,
//!     created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::SessionRow;
use crate::repo::{NewSession, SessionStore};

/// PostgreSQL session store
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_by_user_id(&self, user_id: &str) -> DbResult<Option<SessionRow>> {
        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT user_id, refresh_digest, user_agent, source_ip, created_at
            FROM sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn create(&self, session: NewSession) -> DbResult<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (user_id, refresh_digest, user_agent, source_ip)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, refresh_digest, user_agent, source_ip, created_at
            "#,
        )
        .bind(&session.user_id)
        .bind(&session.refresh_digest)
        .bind(&session.user_agent)
        .bind(&session.source_ip)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                DbError::Conflict
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(row)
    }

    async fn delete_by_user_id(&self, user_id: &str) -> DbResult<()> {
        // Deleting an absent row is not an error: already terminated.
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_refresh_digest(&self, user_id: &str, digest: &str) -> DbResult<()> {
        sqlx::query("UPDATE sessions SET refresh_digest = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(digest)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
