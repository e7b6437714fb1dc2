//! Lifecycle errors

use thiserror::Error;

/// Errors returned by the session lifecycle manager.
///
/// Every internal fault is mapped to one of these coarse kinds before it
/// crosses the component boundary; raw storage and codec errors never
/// appear in lifecycle return values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// User id is empty
    #[error("invalid user id")]
    InvalidUserId,

    /// An active session already exists for this user
    #[error("session already exists")]
    AlreadyExists,

    /// No session exists for the verified user
    #[error("user not found")]
    UserNotFound,

    /// Credential is malformed, forged, expired, or revoked
    #[error("invalid credential")]
    InvalidCredential,

    /// Presented refresh secret does not match the stored digest
    #[error("refresh secret mismatch")]
    RefreshMismatch,

    /// Session was terminated by the device-change policy
    #[error("session terminated")]
    SessionTerminated,

    /// Credential or secret generation failed
    #[error("token generation failed")]
    TokenGenerationFailed,

    /// Session could not be persisted
    #[error("failed to create session")]
    CreateSessionFailed,

    /// Session could not be loaded
    #[error("failed to load session")]
    SessionLookupFailed,

    /// Refresh digest could not be replaced
    #[error("failed to update session")]
    UpdateFailed,

    /// Session could not be deleted
    #[error("failed to delete session")]
    DeleteFailed,

    /// Credential could not be recorded as revoked
    #[error("failed to revoke credential")]
    RevokeFailed,

    /// Revocation state could not be read
    #[error("failed to check revocation")]
    CheckRevocationFailed,
}

/// Coarse classification of an [`AuthError`].
///
/// Callers branch on this to keep "access denied" separate from "backend
/// unavailable" when mapping to user-visible responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any I/O (empty or malformed input)
    Input,
    /// Expected conflict (session already exists)
    Conflict,
    /// Expected absence (no session for the user)
    NotFound,
    /// The operation was denied
    Security,
    /// A backing store or codec fault
    Infrastructure,
}

impl AuthError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUserId => ErrorKind::Input,
            Self::AlreadyExists => ErrorKind::Conflict,
            Self::UserNotFound => ErrorKind::NotFound,
            Self::InvalidCredential | Self::RefreshMismatch | Self::SessionTerminated => {
                ErrorKind::Security
            }
            Self::TokenGenerationFailed
            | Self::CreateSessionFailed
            | Self::SessionLookupFailed
            | Self::UpdateFailed
            | Self::DeleteFailed
            | Self::RevokeFailed
            | Self::CheckRevocationFailed => ErrorKind::Infrastructure,
        }
    }

    /// Whether the operation was denied (as opposed to failing)
    pub fn is_security(&self) -> bool {
        self.kind() == ErrorKind::Security
    }
}
