//! Vigil DB - Session store abstractions
//!
//! SQLx-based persistence layer for the session lifecycle manager.
//!
//! # Example
//!
//! ```rust,ignore
//! use vigil_db::{create_pool, PgSessionStore, SessionStore};
//!
//! let pool = create_pool("postgres://localhost/vigil").await?;
//! let store = PgSessionStore::new(pool);
//!
//! let session = store.find_by_user_id("u1").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::PgSessionStore;
pub use pool::{create_pool, DbPool};
pub use repo::*;
