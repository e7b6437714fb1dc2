//! Configuration for the lifecycle manager

use std::time::Duration;

/// Lifecycle manager configuration.
///
/// The signing key is explicit constructor state; nothing in the crate
/// reads key material from ambient or global state at call time.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing key for access credentials
    pub signing_key: Vec<u8>,
    /// Access credential lifetime
    pub access_token_ttl: Duration,
    /// Upper bound on any single storage or ledger call
    pub store_timeout: Duration,
}

impl AuthConfig {
    /// Minimum allowed signing-key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a config with the given signing key.
    ///
    /// # Errors
    /// Returns an error if the key is shorter than 32 bytes.
    pub fn try_new(signing_key: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let signing_key = signing_key.as_ref();
        if signing_key.len() < Self::MIN_KEY_LENGTH {
            return Err(ConfigError::SigningKeyTooShort {
                actual: signing_key.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }

        Ok(Self {
            signing_key: signing_key.to_vec(),
            access_token_ttl: Duration::from_secs(15 * 60),
            store_timeout: Duration::from_secs(5),
        })
    }

    /// Set the access credential lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set the bound on storage calls
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key_length", &self.signing_key.len())
            .field("access_token_ttl", &self.access_token_ttl)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

/// Errors that can occur when building an [`AuthConfig`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("signing key too short: got {actual} bytes, need at least {minimum}")]
    SigningKeyTooShort { actual: usize, minimum: usize },
}
