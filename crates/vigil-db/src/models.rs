//! Row models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A persisted session row.
///
/// At most one row exists per `user_id`; the column is the table's primary
/// key. The refresh secret is stored only as its salted one-way digest.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    /// Owning user identity
    pub user_id: String,
    /// Salted one-way digest of the current refresh secret (PHC string)
    pub refresh_digest: String,
    /// User agent recorded at issuance, compared on rotation
    pub user_agent: String,
    /// Source IP recorded at issuance, compared on rotation
    pub source_ip: String,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}
