//! Revocation ledger
//!
//! A denylist of access credentials invalidated before their natural
//! expiry. The storage engine is a collaborator behind [`RevocationStore`];
//! the ledger owns policy: how credentials are keyed and which TTL entries
//! get.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage fault raised by a revocation store.
///
/// Distinct from a definitive "not revoked" answer; callers must treat a
/// read fault as "cannot currently validate", never as "valid".
#[derive(Debug, thiserror::Error)]
#[error("revocation store failure: {0}")]
pub struct RevocationStoreError(pub String);

/// Key-value store with per-entry expiry, consumed by the ledger
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `key` for `ttl`; overwriting an existing entry is fine
    async fn insert(&self, key: String, ttl: Duration) -> Result<(), RevocationStoreError>;

    /// Whether `key` is currently recorded
    async fn contains(&self, key: &str) -> Result<bool, RevocationStoreError>;
}

/// Namespace prefix for ledger keys
const KEY_PREFIX: &str = "revoked:";

/// Policy layer over a [`RevocationStore`].
///
/// Credentials are keyed by their SHA-256 digest so the raw token never
/// reaches storage. Entries always get the configured access-credential
/// lifetime as TTL, not the credential's remaining time; over-retention is
/// harmless since the credential expires on its own anyway.
pub struct RevocationLedger<R: RevocationStore> {
    store: Arc<R>,
    ttl: Duration,
}

impl<R: RevocationStore> RevocationLedger<R> {
    /// Create a ledger over the given store
    pub fn new(store: Arc<R>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Idempotently mark a credential as revoked
    pub async fn revoke(&self, credential: &str) -> Result<(), RevocationStoreError> {
        self.store.insert(Self::key(credential), self.ttl).await
    }

    /// Whether a credential has been revoked
    pub async fn is_revoked(&self, credential: &str) -> Result<bool, RevocationStoreError> {
        self.store.contains(&Self::key(credential)).await
    }

    fn key(credential: &str) -> String {
        use sha2::Digest;
        let mut hasher = sha2::Sha256::new();
        hasher.update(credential.as_bytes());
        format!("{KEY_PREFIX}{}", hex::encode(hasher.finalize()))
    }
}

impl<R: RevocationStore> std::fmt::Debug for RevocationLedger<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationLedger")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Per-entry expiry policy: each entry lives for the TTL stored as its value
struct PerEntryTtl;

impl Expiry<String, Duration> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Duration,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(*value)
    }
}

/// In-process revocation store.
///
/// Entries expire on their own; there is no explicit deletion path.
pub struct MemoryRevocationStore {
    entries: Cache<String, Duration>,
}

impl MemoryRevocationStore {
    /// Create a store bounded to `max_capacity` live entries
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn insert(&self, key: String, ttl: Duration) -> Result<(), RevocationStoreError> {
        self.entries.insert(key, ttl).await;
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, RevocationStoreError> {
        Ok(self.entries.get(key).await.is_some())
    }
}
