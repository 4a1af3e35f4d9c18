//! Session token minting and Ed25519 signature verification.
//!
//! Tokens use the format: `base64url(payload).base64url(signature)`
//!
//! The payload is a JSON object containing:
//! - `sub`: account ID
//! - `dev`: device ID the token was issued to
//! - `iat`: issued-at timestamp (seconds since epoch)
//! - `exp`: expiry timestamp (seconds since epoch)
//! - `jti`: random token ID, so two tokens are never byte-identical
//!
//! The signature covers `payload_b64.as_bytes()` (the base64url-encoded
//! payload string, not the decoded JSON).

use crate::device::DeviceId;
use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// How far in the future an `iat` may be before the token is rejected.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// The decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account ID.
    pub sub: String,
    /// Device ID.
    pub dev: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID.
    pub jti: String,
}

impl TokenClaims {
    /// Returns the expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns true once `now` has reached the expiry second.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Verifies tokens against a public key. Holds no signing material.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: VerifyingKey,
}

impl TokenVerifier {
    /// Builds a verifier from raw Ed25519 public key bytes.
    pub fn from_public_key(pub_key_bytes: &[u8; 32]) -> LicenseResult<Self> {
        let key = VerifyingKey::from_bytes(pub_key_bytes)
            .map_err(|_| LicenseError::InvalidKey("invalid public key".to_string()))?;
        Ok(Self { key })
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// Parses a token, checks its signature and checks it has not expired at `now`.
    ///
    /// This says nothing about whether the token is still the live token for
    /// its device; that is the session registry's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid, the signature does not verify,
    /// the payload is malformed, the token has expired or it was issued too far
    /// in the future.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> LicenseResult<TokenClaims> {
        let token = token.trim();

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(LicenseError::InvalidTokenFormat(
                "token must have exactly two parts separated by a dot".to_string(),
            ));
        }

        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        let sig_bytes = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
            LicenseError::InvalidTokenFormat(format!("invalid signature base64: {e}"))
        })?;

        let signature = Signature::from_slice(&sig_bytes).map_err(|_| {
            LicenseError::InvalidTokenFormat("invalid signature length".to_string())
        })?;

        self.key
            .verify(payload_b64.as_bytes(), &signature)
            .map_err(|_| LicenseError::InvalidSignature)?;

        let payload_json = URL_SAFE_NO_PAD.decode(payload_b64).map_err(|e| {
            LicenseError::InvalidTokenFormat(format!("invalid payload base64: {e}"))
        })?;

        let claims: TokenClaims = serde_json::from_slice(&payload_json).map_err(|e| {
            LicenseError::InvalidPayload(format!("invalid payload JSON: {e}"))
        })?;

        if claims.is_expired_at(now) {
            let at = claims
                .expires_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.exp.to_string());
            return Err(LicenseError::TokenExpired(at));
        }

        let ahead = claims.iat - now.timestamp();
        if ahead > MAX_CLOCK_SKEW_SECS {
            return Err(LicenseError::IssuedInFuture(ahead));
        }

        Ok(claims)
    }
}

/// Mints tokens with a server-held Ed25519 key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    signing_key: SigningKey,
    verifier: TokenVerifier,
}

impl TokenIssuer {
    /// Creates an issuer from an existing signing key.
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        let verifier = TokenVerifier {
            key: signing_key.verifying_key(),
        };
        Self {
            signing_key,
            verifier,
        }
    }

    /// Creates an issuer from a 32-byte secret seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(SigningKey::from_bytes(seed))
    }

    /// Creates an issuer with a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    /// Returns the secret seed, for persisting the key.
    #[must_use]
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.verifier.public_key()
    }

    /// Returns a verifier for this issuer's tokens.
    #[must_use]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Mints a token for `account_id` on `device_id` that expires `ttl_secs` after `now`.
    ///
    /// `ttl_secs` must be the license time remaining at `now`, so the token
    /// can never outlive the license.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::ZeroLifetime`] when `ttl_secs` is zero.
    pub fn issue(
        &self,
        account_id: &str,
        device_id: &DeviceId,
        ttl_secs: u64,
        now: DateTime<Utc>,
    ) -> LicenseResult<String> {
        if ttl_secs == 0 {
            return Err(LicenseError::ZeroLifetime);
        }

        let iat = now.timestamp();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: account_id.to_string(),
            dev: device_id.as_str().to_string(),
            iat,
            exp: iat.saturating_add(ttl),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let payload_json = serde_json::to_vec(&claims)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json);
        let signature = self.signing_key.sign(payload_b64.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
        Ok(format!("{payload_b64}.{sig_b64}"))
    }

    /// Verifies a token minted by this issuer. See [`TokenVerifier::verify`].
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> LicenseResult<TokenClaims> {
        self.verifier.verify(token, now)
    }
}
