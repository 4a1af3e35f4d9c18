//! Error types for the license crate.

use thiserror::Error;

/// Token and device identifier errors.
///
/// Every variant means "reject this request"; none of them is fatal.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Token is not `payload.signature`.
    #[error("invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Ed25519 signature verification failed.
    #[error("token signature invalid")]
    InvalidSignature,

    /// Payload JSON is malformed or missing required fields.
    #[error("invalid token payload: {0}")]
    InvalidPayload(String),

    /// Token expiry has passed.
    #[error("token expired at {0}")]
    TokenExpired(String),

    /// Token claims to be issued further in the future than the skew allowance.
    #[error("token issued {0}s in the future")]
    IssuedInFuture(i64),

    /// A token must live for at least one second.
    #[error("token lifetime must be positive")]
    ZeroLifetime,

    /// Device identifier is empty, too long or contains control characters.
    #[error("invalid device id: {0}")]
    InvalidDeviceId(String),

    /// Signing or verifying key material is unusable.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true if the token itself was unacceptable (as opposed to bad input or key setup).
    #[must_use]
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidTokenFormat(_)
                | Self::InvalidSignature
                | Self::InvalidPayload(_)
                | Self::TokenExpired(_)
                | Self::IssuedInFuture(_)
        )
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
