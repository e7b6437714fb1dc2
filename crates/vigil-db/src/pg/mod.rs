//! PostgreSQL implementations

mod session;

pub use session::PgSessionStore;
