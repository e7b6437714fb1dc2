//! Application state

use std::sync::Arc;

use vigil_auth_core::{MemoryRevocationStore, SessionLifecycle};
use vigil_db::{DbPool, PgSessionStore};

use crate::config::Config;

/// Type alias for the lifecycle manager with concrete store types
pub type LifecycleImpl = SessionLifecycle<PgSessionStore, MemoryRevocationStore>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session lifecycle manager
    pub lifecycle: Arc<LifecycleImpl>,
    /// Database connection pool (for readiness checks)
    pub pool: DbPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(lifecycle: LifecycleImpl, pool: DbPool, config: Config) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
            pool,
            config: Arc::new(config),
        }
    }
}
