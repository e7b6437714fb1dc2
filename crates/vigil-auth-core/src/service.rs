//! Session lifecycle manager
//!
//! Orchestrates issuance, rotation, and termination over the session
//! store, the revocation ledger, and the credential codec. One session
//! exists per user identity: Absent -> Active -> Absent, with rotation a
//! single atomic replacement of the stored refresh digest.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use vigil_db::{DbError, DbResult, NewSession, SessionStore};
use vigil_types::{TokenPair, UserId};

use crate::{
    config::AuthConfig,
    notify::{AnomalyDispatcher, IpChangeEvent},
    revocation::{RevocationLedger, RevocationStore},
    secret,
    token::TokenCodec,
    AuthError,
};

/// Session lifecycle manager
///
/// Holds no mutable state of its own; all session state lives in the
/// backing store. Concurrent rotations for one user race on the digest:
/// last write wins, and the losing caller's refresh secret fails its next
/// use with [`AuthError::RefreshMismatch`].
pub struct SessionLifecycle<S: SessionStore, R: RevocationStore> {
    store: Arc<S>,
    ledger: RevocationLedger<R>,
    codec: TokenCodec,
    dispatcher: AnomalyDispatcher,
    store_timeout: Duration,
}

impl<S: SessionStore, R: RevocationStore> SessionLifecycle<S, R> {
    /// Create a new lifecycle manager
    pub fn new(
        config: AuthConfig,
        store: Arc<S>,
        revocations: Arc<R>,
        dispatcher: AnomalyDispatcher,
    ) -> Self {
        Self {
            codec: TokenCodec::new(&config.signing_key, config.access_token_ttl),
            ledger: RevocationLedger::new(revocations, config.access_token_ttl),
            store,
            dispatcher,
            store_timeout: config.store_timeout,
        }
    }

    /// Issue a fresh credential pair for a user with no active session.
    ///
    /// One session per user is enforced here: an existing session fails the
    /// call with [`AuthError::AlreadyExists`] rather than being silently
    /// replaced. The store's unique constraint backs this up for racing
    /// calls.
    pub async fn issue(
        &self,
        user_id: &UserId,
        user_agent: &str,
        source_ip: &str,
    ) -> Result<TokenPair, AuthError> {
        if user_id.is_empty() {
            return Err(AuthError::InvalidUserId);
        }

        let existing = self
            .bounded(self.store.find_by_user_id(user_id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "failed to look up session");
                AuthError::CreateSessionFailed
            })?;

        if existing.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let (pair, digest) = self.mint_pair(user_id).await?;

        let session = NewSession {
            user_id: user_id.to_string(),
            refresh_digest: digest,
            user_agent: user_agent.to_string(),
            source_ip: source_ip.to_string(),
        };

        match self.bounded(self.store.create(session)).await {
            Ok(_) => Ok(pair),
            Err(DbError::Conflict) => Err(AuthError::AlreadyExists),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "failed to create session");
                Err(AuthError::CreateSessionFailed)
            }
        }
    }

    /// Exchange a valid credential pair for a new one.
    ///
    /// The previous refresh secret is invalidated by the digest overwrite;
    /// if the overwrite fails, the previous secret remains authoritative.
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
        user_agent: &str,
        source_ip: &str,
    ) -> Result<TokenPair, AuthError> {
        // Revocation wins over cryptographic validity.
        self.check_revoked(access_token).await?;

        // Reject forged input before any session lookup.
        let claims = self.codec.verify(access_token)?;
        let user_id = UserId::new(claims.sub);

        let session = self
            .bounded(self.store.find_by_user_id(user_id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "failed to load session");
                AuthError::SessionLookupFailed
            })?
            .ok_or(AuthError::UserNotFound)?;

        // A reused pre-rotation secret or an outright forgery lands here.
        if !self.digest_matches(refresh_token, &session.refresh_digest).await? {
            tracing::warn!(user_id = %user_id, "refresh secret mismatch");
            return Err(AuthError::RefreshMismatch);
        }

        if user_agent != session.user_agent {
            // New device presenting an old secret: force re-authentication.
            self.bounded(self.store.delete_by_user_id(user_id.as_str()))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, user_id = %user_id, "failed to delete session");
                    AuthError::DeleteFailed
                })?;
            tracing::warn!(user_id = %user_id, "user agent changed, session terminated");
            return Err(AuthError::SessionTerminated);
        }

        if source_ip != session.source_ip {
            self.dispatcher.dispatch(IpChangeEvent {
                user_id: user_id.clone(),
                previous_ip: session.source_ip.clone(),
                new_ip: source_ip.to_string(),
            });
        }

        let (pair, digest) = self.mint_pair(&user_id).await?;

        self.bounded(self.store.update_refresh_digest(user_id.as_str(), &digest))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "failed to update refresh digest");
                AuthError::UpdateFailed
            })?;

        Ok(pair)
    }

    /// Terminate a session, revoking the access credential first.
    ///
    /// Revocation must succeed before the session is deleted; otherwise a
    /// still-valid credential would outlive the session state.
    pub async fn logout(&self, access_token: &str, user_id: &UserId) -> Result<(), AuthError> {
        match timeout(self.store_timeout, self.ledger.revoke(access_token)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, user_id = %user_id, "failed to revoke credential");
                return Err(AuthError::RevokeFailed);
            }
            Err(_) => return Err(AuthError::RevokeFailed),
        }

        self.bounded(self.store.delete_by_user_id(user_id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user_id, "failed to delete session");
                AuthError::DeleteFailed
            })
    }

    /// Verify an access credential and return the user it asserts.
    ///
    /// Pure read path: revocation check, then cryptographic verification.
    pub async fn check_validity(&self, access_token: &str) -> Result<UserId, AuthError> {
        self.check_revoked(access_token).await?;
        let claims = self.codec.verify(access_token)?;
        Ok(UserId::new(claims.sub))
    }

    /// Reject a revoked credential; a ledger fault is an outage, not a denial.
    async fn check_revoked(&self, access_token: &str) -> Result<(), AuthError> {
        match timeout(self.store_timeout, self.ledger.is_revoked(access_token)).await {
            Ok(Ok(false)) => Ok(()),
            Ok(Ok(true)) => {
                tracing::debug!("credential has been revoked");
                Err(AuthError::InvalidCredential)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to check revocation");
                Err(AuthError::CheckRevocationFailed)
            }
            Err(_) => Err(AuthError::CheckRevocationFailed),
        }
    }

    /// Generate a new credential pair and the digest to persist.
    ///
    /// Digesting runs on the blocking pool; it is deliberately slow.
    async fn mint_pair(&self, user_id: &UserId) -> Result<(TokenPair, String), AuthError> {
        let access_token = self.codec.issue(user_id)?;
        let refresh_token = secret::generate()?;

        let to_digest = refresh_token.clone();
        let digest = tokio::task::spawn_blocking(move || secret::digest(&to_digest))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "digest task failed");
                AuthError::TokenGenerationFailed
            })??;

        let pair = TokenPair::new(access_token, refresh_token, self.codec.ttl().as_secs());
        Ok((pair, digest))
    }

    /// Compare a presented secret against the stored digest on the blocking pool
    async fn digest_matches(
        &self,
        refresh_token: &str,
        stored_digest: &str,
    ) -> Result<bool, AuthError> {
        let presented = refresh_token.to_string();
        let stored = stored_digest.to_string();

        tokio::task::spawn_blocking(move || secret::matches(&presented, &stored))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "digest comparison task failed");
                AuthError::TokenGenerationFailed
            })
    }

    /// Bound a storage call by the configured timeout
    async fn bounded<T>(&self, fut: impl Future<Output = DbResult<T>>) -> DbResult<T> {
        match timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout),
        }
    }
}

impl<S: SessionStore, R: RevocationStore> std::fmt::Debug for SessionLifecycle<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycle")
            .field("codec", &self.codec)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}
