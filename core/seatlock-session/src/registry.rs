//! Session registry: one live `(device, token)` pair per account.
//!
//! Exclusivity is enforced here, server side, because device IDs are
//! client-supplied. The registry holds no state of its own; every call goes
//! to the store.

use crate::credential::constant_time_eq;
use crate::error::AuthResult;
use chrono::{DateTime, Utc};
use seatlock_license::DeviceId;
use seatlock_store::{AccountStore, Session};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn AccountStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Makes `(device_id, token)` the only live session of `account_id`.
    ///
    /// Whatever device held the session before loses it. This is one upsert
    /// in the store, so concurrent logins resolve to whichever write the
    /// store orders last.
    pub async fn establish(
        &self,
        account_id: &str,
        device_id: &DeviceId,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Session> {
        let session = self
            .store
            .establish_session(account_id, device_id.as_str(), token, now)
            .await?;
        debug!(account = %account_id, device = %device_id, "session established");
        Ok(session)
    }

    /// Replaces the live token of `(device_id, current_token)` with `new_token`.
    ///
    /// Returns `None` if the session was taken over since `current_token`
    /// was validated; the newer session is left alone.
    pub async fn rotate(
        &self,
        account_id: &str,
        device_id: &DeviceId,
        current_token: &str,
        new_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        let rotated = self
            .store
            .rotate_session(
                account_id,
                device_id.as_str(),
                current_token.trim(),
                new_token,
                now,
            )
            .await?;
        if rotated.is_some() {
            debug!(account = %account_id, device = %device_id, "session token rotated");
        }
        Ok(rotated)
    }

    /// Returns the live session, if the account has one.
    pub async fn current(&self, account_id: &str) -> AuthResult<Option<Session>> {
        Ok(self.store.get_session(account_id).await?)
    }

    /// True only if both the device and the token equal the live session.
    pub async fn matches(
        &self,
        account_id: &str,
        device_id: &DeviceId,
        token: &str,
    ) -> AuthResult<bool> {
        let Some(session) = self.current(account_id).await? else {
            return Ok(false);
        };
        Ok(session.device_id == device_id.as_str()
            && constant_time_eq(session.token.as_bytes(), token.trim().as_bytes()))
    }
}
