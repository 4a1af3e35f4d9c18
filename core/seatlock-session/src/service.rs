//! Login, refresh and check.
//!
//! These compose the clock, the issuer and the registry. Every flow reads
//! the account fresh from the store; nothing is carried over from an older
//! token except its identity.

use crate::credential::CredentialVerifier;
use crate::error::{AuthError, AuthResult};
use crate::registry::SessionRegistry;
use crate::validator::{SessionValidator, ValidatedSession};
use seatlock_license::{is_expired, remaining, Clock, DeviceId, TokenIssuer};
use seatlock_store::{AccountStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

const BAD_CREDENTIALS: &str = "invalid account or password";

/// A freshly minted token and the license time it is good for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub token: String,
    pub remaining_secs: u64,
}

/// Read-only answer to a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCheck {
    pub account_id: String,
    pub remaining_secs: u64,
}

/// The license core as seen by the transport layer.
#[derive(Clone)]
pub struct LicenseService {
    store: Arc<dyn AccountStore>,
    registry: SessionRegistry,
    validator: SessionValidator,
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl LicenseService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(Arc::clone(&store)),
            validator: SessionValidator::new(
                Arc::clone(&store),
                Arc::clone(&issuer),
                Arc::clone(&clock),
            ),
            store,
            issuer,
            clock,
            credentials,
        }
    }

    /// Returns the gate used for protected operations.
    pub fn validator(&self) -> &SessionValidator {
        &self.validator
    }

    /// Returns the registry backing this service.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Authenticates `account_id` on `device_id` and makes it the account's only live device.
    ///
    /// The first successful login starts the license clock. A login that
    /// finds no time left fails with [`AuthError::LicenseExpired`] and does
    /// not touch the existing session.
    pub async fn login(
        &self,
        account_id: &str,
        credential: &str,
        device_id: &str,
    ) -> AuthResult<SessionGrant> {
        let account_id = require("account_id", account_id)?;
        if credential.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }
        let device = DeviceId::parse(device_id)?;

        let account = match self.store.get_account(account_id).await {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                debug!(account = %account_id, "login for unknown account");
                return Err(AuthError::Unauthenticated(BAD_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(AuthError::Store(e)),
        };

        if !self.verify_credential(credential, &account.credential_hash).await? {
            debug!(account = %account.id, "login with wrong password");
            return Err(AuthError::Unauthenticated(BAD_CREDENTIALS.to_string()));
        }

        let now = self.clock.now();
        let activated_at = match account.activated_at {
            Some(at) => at,
            None => {
                let at = self
                    .store
                    .set_activation_time_if_unset(&account.id, now)
                    .await
                    .map_err(account_gone)?;
                info!(account = %account.id, activated_at = %at, "license activated");
                at
            }
        };

        let remaining_secs = remaining(account.duration_secs, activated_at, now);
        if is_expired(remaining_secs) {
            info!(account = %account.id, "login refused, license expired");
            return Err(AuthError::LicenseExpired);
        }

        let token = self.issuer.issue(&account.id, &device, remaining_secs, now)?;
        self.registry
            .establish(&account.id, &device, &token, now)
            .await
            .map_err(not_found_as_gone)?;

        info!(account = %account.id, device = %device, remaining_secs, "login");
        Ok(SessionGrant {
            token,
            remaining_secs,
        })
    }

    /// Swaps a live token for a new one sized to the license time left right now.
    ///
    /// Any extension granted since the old token was minted is picked up here.
    /// The swap only lands if the old token is still live when it is written,
    /// so a refresh racing a login on another device fails as
    /// [`AuthError::Superseded`] instead of taking the session back.
    pub async fn refresh(&self, token: &str, device_id: &str) -> AuthResult<SessionGrant> {
        let session = self.validate(token, device_id).await?;

        let new_token = self.issuer.issue(
            &session.account_id,
            &session.device_id,
            session.remaining_secs,
            session.checked_at,
        )?;
        let rotated = self
            .registry
            .rotate(
                &session.account_id,
                &session.device_id,
                token,
                &new_token,
                session.checked_at,
            )
            .await?;
        if rotated.is_none() {
            debug!(account = %session.account_id, "refresh lost to a newer login");
            return Err(AuthError::Superseded);
        }

        debug!(
            account = %session.account_id,
            device = %session.device_id,
            remaining_secs = session.remaining_secs,
            "refresh"
        );
        Ok(SessionGrant {
            token: new_token,
            remaining_secs: session.remaining_secs,
        })
    }

    /// Reports identity and license time left. Changes nothing.
    pub async fn check(&self, token: &str, device_id: &str) -> AuthResult<LicenseCheck> {
        let session = self.validate(token, device_id).await?;
        Ok(LicenseCheck {
            account_id: session.account_id,
            remaining_secs: session.remaining_secs,
        })
    }

    /// Diagnostic: is `token` the usable live session of `account_id` on `device_id`?
    ///
    /// Rejections become `false`; only bad input and store failures are errors.
    pub async fn session_valid(
        &self,
        account_id: &str,
        device_id: &str,
        token: &str,
    ) -> AuthResult<bool> {
        let account_id = require("account_id", account_id)?;
        let token = require("token", token)?;
        match self.validate(token, device_id).await {
            Ok(session) => Ok(session.account_id == account_id),
            Err(
                AuthError::Unauthenticated(_) | AuthError::Superseded | AuthError::LicenseExpired,
            ) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn validate(&self, token: &str, device_id: &str) -> AuthResult<ValidatedSession> {
        let token = require("token", token)?;
        let device = DeviceId::parse(device_id)?;
        self.validator.validate(token, &device).await
    }

    /// Runs on the blocking pool; Argon2 would stall an async worker.
    async fn verify_credential(&self, credential: &str, hash: &str) -> AuthResult<bool> {
        let credentials = Arc::clone(&self.credentials);
        let credential = credential.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || credentials.verify(&credential, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("credential task failed: {e}")))?
    }
}

fn require<'a>(field: &str, value: &'a str) -> AuthResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// The account vanished mid-flow (deleted by an admin).
fn account_gone(err: StoreError) -> AuthError {
    if err.is_not_found() {
        AuthError::Unauthenticated("account no longer exists".to_string())
    } else {
        AuthError::Store(err)
    }
}

fn not_found_as_gone(err: AuthError) -> AuthError {
    match err {
        AuthError::NotFound(_) => {
            AuthError::Unauthenticated("account no longer exists".to_string())
        }
        other => other,
    }
}
