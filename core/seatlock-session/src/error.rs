//! Error types for session and license flows.

use seatlock_license::LicenseError;
use seatlock_store::StoreError;
use thiserror::Error;

/// Result type for session operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a license or admin operation was refused.
///
/// Each variant is a distinct, user-actionable outcome: re-enter input,
/// log in again, a newer device took over, buy more time, or retry later.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input. Never reaches the clock or registry.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Bad credential, or a token that is malformed, forged or expired.
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    /// The token is valid but another device has logged in since.
    #[error("session superseded by another device")]
    Superseded,

    /// The license has no time left.
    #[error("license expired")]
    LicenseExpired,

    /// Admin operation on an account that does not exist.
    #[error("account not found: {0}")]
    NotFound(String),

    /// Admin operation would create a duplicate account.
    #[error("account already exists: {0}")]
    Conflict(String),

    /// The account store failed. Never conflated with "not found".
    #[error("store error: {0}")]
    Store(StoreError),

    /// Server-side misconfiguration (bad key material, corrupt hash).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable category string for API responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_request",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Superseded => "session_superseded",
            Self::LicenseExpired => "license_expired",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::AlreadyExists(id) => Self::Conflict(id),
            other => Self::Store(other),
        }
    }
}

impl From<LicenseError> for AuthError {
    fn from(err: LicenseError) -> Self {
        match err {
            LicenseError::InvalidDeviceId(msg) => Self::Validation(format!("device id: {msg}")),
            LicenseError::ZeroLifetime => Self::LicenseExpired,
            e if e.is_token_rejection() => Self::Unauthenticated(e.to_string()),
            e => Self::Internal(e.to_string()),
        }
    }
}
