//! Shared test harness

pub mod mock_stores;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use vigil_auth_core::{AnomalyDispatcher, AuthConfig, DispatcherHandle, IpChangeEvent, SessionLifecycle};

use mock_stores::{MockRevocationStore, MockSessionStore, RecordingNotifier};

/// Signing key used across tests (32 bytes)
pub const TEST_SIGNING_KEY: &str = "test-signing-key-0123456789abcdef";

/// A lifecycle manager wired to in-memory stores and a recording notifier
pub struct Harness {
    pub lifecycle: SessionLifecycle<MockSessionStore, MockRevocationStore>,
    pub sessions: MockSessionStore,
    pub revocations: MockRevocationStore,
    pub events: Arc<Mutex<Vec<IpChangeEvent>>>,
    pub handle: DispatcherHandle,
}

impl Harness {
    /// Drop the lifecycle (and with it the dispatcher), drain the
    /// notification channel, and return the recorded events.
    #[allow(dead_code)]
    pub async fn drain_events(self) -> Vec<IpChangeEvent> {
        drop(self.lifecycle);
        self.handle.shutdown().await;
        self.events.lock().unwrap().clone()
    }
}

/// Build a harness with default test configuration.
///
/// Must be called from within a tokio runtime (the dispatcher spawns its
/// background task).
pub fn harness() -> Harness {
    let sessions = MockSessionStore::new();
    let revocations = MockRevocationStore::new();
    let recorder = RecordingNotifier::default();
    let events = recorder.events();

    let (dispatcher, handle) = AnomalyDispatcher::new(Arc::new(recorder), 16);

    let config = AuthConfig::try_new(TEST_SIGNING_KEY)
        .unwrap()
        .with_access_token_ttl(Duration::from_secs(900))
        .with_store_timeout(Duration::from_secs(2));

    let lifecycle = SessionLifecycle::new(
        config,
        Arc::new(sessions.clone()),
        Arc::new(revocations.clone()),
        dispatcher,
    );

    Harness {
        lifecycle,
        sessions,
        revocations,
        events,
        handle,
    }
}
