//! In-memory collaborators with fault injection

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use vigil_auth_core::{
    AnomalyNotifier, IpChangeEvent, NotifyError, RevocationStore, RevocationStoreError,
};
use vigil_db::{DbError, DbResult, NewSession, SessionRow, SessionStore};

/// In-memory session store keyed by user id.
///
/// `fail_reads`/`fail_writes` turn subsequent calls into storage faults so
/// tests can exercise the infrastructure error paths.
#[derive(Default, Clone)]
pub struct MockSessionStore {
    sessions: Arc<DashMap<String, SessionRow>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn contains(&self, user_id: &str) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Drop a session behind the lifecycle manager's back
    #[allow(dead_code)]
    pub fn remove(&self, user_id: &str) {
        self.sessions.remove(user_id);
    }

    fn check_read(&self) -> DbResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Timeout);
        }
        Ok(())
    }

    fn check_write(&self) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Timeout);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn find_by_user_id(&self, user_id: &str) -> DbResult<Option<SessionRow>> {
        self.check_read()?;
        Ok(self.sessions.get(user_id).map(|r| r.value().clone()))
    }

    async fn create(&self, session: NewSession) -> DbResult<SessionRow> {
        self.check_write()?;
        if self.sessions.contains_key(&session.user_id) {
            return Err(DbError::Conflict);
        }
        let row = SessionRow {
            user_id: session.user_id.clone(),
            refresh_digest: session.refresh_digest,
            user_agent: session.user_agent,
            source_ip: session.source_ip,
            created_at: Utc::now(),
        };
        self.sessions.insert(row.user_id.clone(), row.clone());
        Ok(row)
    }

    async fn delete_by_user_id(&self, user_id: &str) -> DbResult<()> {
        self.check_write()?;
        self.sessions.remove(user_id);
        Ok(())
    }

    async fn update_refresh_digest(&self, user_id: &str, digest: &str) -> DbResult<()> {
        self.check_write()?;
        if let Some(mut session) = self.sessions.get_mut(user_id) {
            session.refresh_digest = digest.to_string();
        }
        Ok(())
    }
}

/// In-memory revocation store with wall-clock expiry and fault injection
#[derive(Default, Clone)]
pub struct MockRevocationStore {
    entries: Arc<DashMap<String, Instant>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RevocationStore for MockRevocationStore {
    async fn insert(&self, key: String, ttl: Duration) -> Result<(), RevocationStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RevocationStoreError("injected write fault".to_string()));
        }
        self.entries.insert(key, Instant::now() + ttl);
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, RevocationStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RevocationStoreError("injected read fault".to_string()));
        }
        // The ref guard must be released before removing an expired entry.
        let live = match self.entries.get(key) {
            Some(expiry) => *expiry.value() > Instant::now(),
            None => return Ok(false),
        };
        if !live {
            self.entries.remove(key);
        }
        Ok(live)
    }
}

/// Notifier that records every delivered event
#[derive(Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<IpChangeEvent>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Arc<Mutex<Vec<IpChangeEvent>>> {
        Arc::clone(&self.events)
    }
}

#[async_trait]
impl AnomalyNotifier for RecordingNotifier {
    async fn notify(&self, event: &IpChangeEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
