//! Access credential encoding and verification

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use vigil_types::UserId;

use crate::AuthError;

/// Claims carried by an access credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    /// Unique credential identifier
    pub jti: String,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Check if the claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Signs and verifies access credentials.
///
/// The signature algorithm is pinned to HS512; a credential presenting any
/// other algorithm fails verification regardless of its contents.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from raw key bytes and the credential lifetime
    pub fn new(signing_key: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            ttl,
        }
    }

    /// The configured credential lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed credential asserting `user_id` until `now + ttl`
    pub fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("failed to encode access credential: {}", e);
            AuthError::TokenGenerationFailed
        })
    }

    /// Verify a credential and return its claims.
    ///
    /// Side-effect free; does not consult the revocation ledger.
    pub fn verify(&self, credential: &str) -> Result<AccessClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS512);

        decode::<AccessClaims>(credential, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("rejected access credential: {}", e);
                AuthError::InvalidCredential
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&[7u8; 32], Duration::from_secs(900))
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = codec();
        let user_id = UserId::new("user-1");

        let credential = codec.issue(&user_id).unwrap();
        let claims = codec.verify(&credential).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert!(Uuid::parse_str(&claims.jti).is_ok());
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_each_credential_has_unique_id() {
        let codec = codec();
        let user_id = UserId::new("user-1");

        let a = codec.verify(&codec.issue(&user_id).unwrap()).unwrap();
        let b = codec.verify(&codec.issue(&user_id).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = TokenCodec::new(&[1u8; 32], Duration::from_secs(900));
        let verifier = TokenCodec::new(&[2u8; 32], Duration::from_secs(900));

        let credential = signer.issue(&UserId::new("user-1")).unwrap();
        assert_eq!(
            verifier.verify(&credential),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_expired_credential_rejected() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: "user-1".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let credential = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();

        assert_eq!(codec.verify(&credential), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        // Same key, weaker algorithm: the pinned HS512 check must refuse it.
        let codec = codec();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: "user-1".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 900,
        };
        let credential = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();

        assert_eq!(codec.verify(&credential), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_malformed_credential_rejected() {
        let codec = codec();
        for garbage in ["", "nodots", "a.b", "a.b.c", "....."] {
            assert_eq!(
                codec.verify(garbage),
                Err(AuthError::InvalidCredential),
                "should reject {garbage:?}"
            );
        }
    }
}
