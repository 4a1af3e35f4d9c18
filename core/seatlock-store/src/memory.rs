//! In-process store.
//!
//! Both maps sit behind one mutex, so every operation is trivially atomic.
//! The lock is released before any `.await`.

use crate::error::{StoreError, StoreResult};
use crate::model::{Account, AccountSummary, NewAccount, Session};
use crate::AccountStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<String, Account>,
    sessions: HashMap<String, Session>,
}

/// Account store kept entirely in memory. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account(&self, id: &str) -> StoreResult<Account> {
        self.tables()
            .accounts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.tables();
        if tables.accounts.contains_key(&account.id) {
            return Err(StoreError::AlreadyExists(account.id));
        }
        let stored = Account {
            id: account.id.clone(),
            credential_hash: account.credential_hash,
            duration_secs: account.duration_secs,
            activated_at: None,
            created_at: account.created_at,
        };
        tables.accounts.insert(account.id, stored.clone());
        Ok(stored)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountSummary>> {
        Ok(self.tables().accounts.values().map(Account::summary).collect())
    }

    async fn delete_account(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables();
        if tables.accounts.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tables.sessions.remove(id);
        Ok(())
    }

    async fn extend_duration(&self, id: &str, extra_secs: u64) -> StoreResult<u64> {
        let mut tables = self.tables();
        let account = tables
            .accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        account.duration_secs = account.duration_secs.saturating_add(extra_secs);
        Ok(account.duration_secs)
    }

    async fn set_activation_time_if_unset(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>> {
        let mut tables = self.tables();
        let account = tables
            .accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(*account.activated_at.get_or_insert(at))
    }

    async fn get_session(&self, account_id: &str) -> StoreResult<Option<Session>> {
        Ok(self.tables().sessions.get(account_id).cloned())
    }

    async fn establish_session(
        &self,
        account_id: &str,
        device_id: &str,
        token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let mut tables = self.tables();
        if !tables.accounts.contains_key(account_id) {
            return Err(StoreError::NotFound(account_id.to_string()));
        }
        let session = Session {
            account_id: account_id.to_string(),
            device_id: device_id.to_string(),
            token: token.to_string(),
            established_at: at,
        };
        tables
            .sessions
            .insert(account_id.to_string(), session.clone());
        Ok(session)
    }

    async fn rotate_session(
        &self,
        account_id: &str,
        device_id: &str,
        current_token: &str,
        new_token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Session>> {
        let mut tables = self.tables();
        let Some(session) = tables.sessions.get_mut(account_id) else {
            return Ok(None);
        };
        if session.device_id != device_id || session.token != current_token {
            return Ok(None);
        }
        session.token = new_token.to_string();
        session.established_at = at;
        Ok(Some(session.clone()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
