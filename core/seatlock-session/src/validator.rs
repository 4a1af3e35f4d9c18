//! Request-time gate for protected operations.
//!
//! The checks run in a fixed order so each failure surfaces as its own
//! category:
//! 1. Token signature and expiry → `Unauthenticated`
//! 2. Account still exists → `Unauthenticated`
//! 3. `(device, token)` is the account's live session → `Superseded`
//! 4. License has time left → `LicenseExpired`
//!
//! A token presented from a device other than the live one, including a
//! token copied off the live device, fails step 3.

use crate::error::{AuthError, AuthResult};
use crate::registry::SessionRegistry;
use chrono::{DateTime, Utc};
use seatlock_license::{is_expired, remaining, Clock, DeviceId, TokenClaims, TokenIssuer};
use seatlock_store::AccountStore;
use std::sync::Arc;
use tracing::debug;

/// A request that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    pub account_id: String,
    pub device_id: DeviceId,
    /// Whole seconds of license left at `checked_at`.
    pub remaining_secs: u64,
    /// The instant all checks were evaluated against.
    pub checked_at: DateTime<Utc>,
    pub claims: TokenClaims,
}

#[derive(Clone)]
pub struct SessionValidator {
    store: Arc<dyn AccountStore>,
    registry: SessionRegistry,
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(
        store: Arc<dyn AccountStore>,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(Arc::clone(&store)),
            store,
            issuer,
            clock,
        }
    }

    /// Runs all four checks for `token` presented by `device_id`.
    pub async fn validate(&self, token: &str, device_id: &DeviceId) -> AuthResult<ValidatedSession> {
        let now = self.clock.now();

        let claims = self.issuer.verify(token, now)?;

        let account = match self.store.get_account(&claims.sub).await {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                return Err(AuthError::Unauthenticated("account no longer exists".to_string()));
            }
            Err(e) => return Err(AuthError::Store(e)),
        };

        if !self.registry.matches(&account.id, device_id, token).await? {
            debug!(account = %account.id, device = %device_id, "rejecting superseded session");
            return Err(AuthError::Superseded);
        }

        let Some(activated_at) = account.activated_at else {
            return Err(AuthError::Unauthenticated(
                "account has not been activated".to_string(),
            ));
        };
        let remaining_secs = remaining(account.duration_secs, activated_at, now);
        if is_expired(remaining_secs) {
            return Err(AuthError::LicenseExpired);
        }

        Ok(ValidatedSession {
            account_id: account.id,
            device_id: device_id.clone(),
            remaining_secs,
            checked_at: now,
            claims,
        })
    }
}
