//! Account provisioning.
//!
//! Plain CRUD over the store. Nothing here touches the clock, the issuer
//! or sessions; extending a license only raises its total duration.

use crate::credential::CredentialVerifier;
use crate::error::{AuthError, AuthResult};
use seatlock_license::Clock;
use seatlock_store::{AccountStore, AccountSummary, NewAccount};
use std::sync::Arc;
use tracing::info;

/// Longest accepted account ID, in bytes.
pub const MAX_ACCOUNT_ID_LEN: usize = 254;

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        credentials: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            credentials,
            clock,
        }
    }

    /// Provisions an account. Its license clock starts at its first login.
    ///
    /// A zero duration is accepted: the account exists but every login fails
    /// as expired until it is extended.
    pub async fn create_account(
        &self,
        account_id: &str,
        password: &str,
        duration_secs: u64,
    ) -> AuthResult<AccountSummary> {
        let account_id = account_id.trim();
        if account_id.is_empty() {
            return Err(AuthError::Validation("account_id is required".to_string()));
        }
        if account_id.len() > MAX_ACCOUNT_ID_LEN {
            return Err(AuthError::Validation(format!(
                "account_id longer than {MAX_ACCOUNT_ID_LEN} bytes"
            )));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        let credentials = Arc::clone(&self.credentials);
        let password = password.to_string();
        let credential_hash = tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("credential task failed: {e}")))??;

        let account = self
            .store
            .insert_account(NewAccount {
                id: account_id.to_string(),
                credential_hash,
                duration_secs,
                created_at: self.clock.now(),
            })
            .await?;

        info!(account = %account.id, duration_secs, "account created");
        Ok(account.summary())
    }

    pub async fn list_accounts(&self) -> AuthResult<Vec<AccountSummary>> {
        Ok(self.store.list_accounts().await?)
    }

    /// Deletes an account; its live session goes with it.
    pub async fn delete_account(&self, account_id: &str) -> AuthResult<()> {
        self.store.delete_account(account_id.trim()).await?;
        info!(account = %account_id.trim(), "account deleted");
        Ok(())
    }

    /// Adds time to a license and returns the new total duration.
    ///
    /// Takes effect on the very next check, even for a license that had
    /// already run out. The activation time is never shifted.
    pub async fn extend_duration(&self, account_id: &str, extra_secs: u64) -> AuthResult<u64> {
        if extra_secs == 0 {
            return Err(AuthError::Validation(
                "extra_seconds must be positive".to_string(),
            ));
        }
        let total = self
            .store
            .extend_duration(account_id.trim(), extra_secs)
            .await?;
        info!(account = %account_id.trim(), extra_secs, total, "license extended");
        Ok(total)
    }
}
