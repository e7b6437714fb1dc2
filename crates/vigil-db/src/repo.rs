//! Session store trait
//!
//! Defines the async storage interface consumed by the lifecycle manager.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::models::SessionRow;

/// Session store trait
///
/// `find_by_user_id` returns `Ok(None)` for an absent session — that is the
/// expected signal that a user may be issued a fresh session, not a fault.
/// `delete_by_user_id` and `update_refresh_digest` treat an absent row as
/// already-terminated and succeed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Find the session for a user, if one exists
    async fn find_by_user_id(&self, user_id: &str) -> DbResult<Option<SessionRow>>;

    /// Create a new session
    ///
    /// Fails with [`crate::DbError::Conflict`] if a session already exists
    /// for the user.
    async fn create(&self, session: NewSession) -> DbResult<SessionRow>;

    /// Delete the session for a user
    async fn delete_by_user_id(&self, user_id: &str) -> DbResult<()>;

    /// Replace the stored refresh-secret digest for a user
    async fn update_refresh_digest(&self, user_id: &str, digest: &str) -> DbResult<()>;
}

/// Create session input
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: String,
    pub refresh_digest: String,
    pub user_agent: String,
    pub source_ip: String,
}
