//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A row already exists for the given key
    #[error("record already exists")]
    Conflict,

    /// The caller-supplied bound on the storage call elapsed
    #[error("storage call timed out")]
    Timeout,
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
