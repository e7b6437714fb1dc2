//! Token types

use serde::{Deserialize, Serialize};

/// Token pair returned after issuance or rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access credential (short-lived)
    pub access_token: String,
    /// Refresh secret (long-lived, opaque)
    pub refresh_token: String,
    /// Access credential lifetime in seconds
    pub expires_in: u64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

impl TokenPair {
    /// Create a new bearer token pair
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}
