//! Refresh secret generation and digesting
//!
//! Refresh secrets are high-entropy opaque strings handed to the caller and
//! never stored; only the salted Argon2id digest is persisted. The digest
//! cost makes a leaked digest useless within a credential's lifetime.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use password_hash::{PasswordHash, SaltString};

use crate::AuthError;

/// Number of random bytes in a refresh secret (256 bits)
const SECRET_LENGTH: usize = 32;

/// Generate a new opaque refresh secret.
///
/// # Errors
/// Fails only if the OS entropy source fails.
pub fn generate() -> Result<String, AuthError> {
    let mut raw = [0u8; SECRET_LENGTH];
    getrandom::getrandom(&mut raw).map_err(|e| {
        tracing::error!("entropy source failure: {}", e);
        AuthError::TokenGenerationFailed
    })?;

    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Digest a refresh secret for storage.
///
/// Returns a PHC-format string embedding the salt and parameters.
pub fn digest(secret: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| {
        tracing::error!("entropy source failure: {}", e);
        AuthError::TokenGenerationFailed
    })?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        tracing::error!("failed to encode salt: {}", e);
        AuthError::TokenGenerationFailed
    })?;

    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("failed to digest refresh secret: {}", e);
            AuthError::TokenGenerationFailed
        })?
        .to_string();

    Ok(phc)
}

/// Verify a presented secret against a stored digest.
///
/// An unparseable digest counts as a mismatch.
pub fn matches(secret: &str, stored_digest: &str) -> bool {
    match PasswordHash::new(stored_digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secrets_are_unique() {
        let a = generate().unwrap();
        let b = generate().unwrap();
        assert_ne!(a, b);
        // 32 bytes, base64 without padding
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_digest_roundtrip() {
        let secret = generate().unwrap();
        let stored = digest(&secret).unwrap();

        assert!(stored.starts_with("$argon2"));
        assert!(matches(&secret, &stored));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let stored = digest("correct-secret").unwrap();
        assert!(!matches("wrong-secret", &stored));
    }

    #[test]
    fn test_salted_digests_differ() {
        let a = digest("same-secret").unwrap();
        let b = digest("same-secret").unwrap();
        assert_ne!(a, b);
        assert!(matches("same-secret", &a));
        assert!(matches("same-secret", &b));
    }

    #[test]
    fn test_malformed_digest_is_mismatch() {
        assert!(!matches("anything", "not-a-phc-string"));
        assert!(!matches("anything", ""));
    }
}
