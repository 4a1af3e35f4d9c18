//! Shared test harness: in-memory store, frozen clock, fast Argon2.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use seatlock_license::{Clock, ManualClock, TokenIssuer};
use seatlock_session::{AdminService, Argon2Credentials, KdfParams, LicenseService};
use seatlock_store::{
    Account, AccountStore, AccountSummary, MemoryStore, NewAccount, Session, StoreError,
    StoreResult,
};
use std::sync::Arc;

pub const PASSWORD: &str = "correct horse battery staple";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn test_credentials() -> Arc<Argon2Credentials> {
    Arc::new(Argon2Credentials::new(&KdfParams::testing()).unwrap())
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub issuer: Arc<TokenIssuer>,
    pub service: LicenseService,
    pub admin: AdminService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let issuer = Arc::new(TokenIssuer::generate());
        let credentials = test_credentials();

        let service = LicenseService::new(
            store.clone(),
            Arc::clone(&issuer),
            clock.clone(),
            credentials.clone(),
        );
        let admin = AdminService::new(store.clone(), credentials, clock.clone());

        Self {
            store,
            clock,
            issuer,
            service,
            admin,
        }
    }

    /// Creates an account with the shared test password.
    pub async fn provision(&self, account_id: &str, duration_secs: u64) {
        self.admin
            .create_account(account_id, PASSWORD, duration_secs)
            .await
            .unwrap();
    }

    pub fn advance(&self, secs: i64) {
        self.clock.advance_secs(secs);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn account(&self, account_id: &str) -> Account {
        self.store.get_account(account_id).await.unwrap()
    }
}

/// A store whose backend is always down.
pub struct UnavailableStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Backend("connection refused".to_string()))
}

#[async_trait]
impl AccountStore for UnavailableStore {
    async fn get_account(&self, _id: &str) -> StoreResult<Account> {
        down()
    }

    async fn insert_account(&self, _account: NewAccount) -> StoreResult<Account> {
        down()
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountSummary>> {
        down()
    }

    async fn delete_account(&self, _id: &str) -> StoreResult<()> {
        down()
    }

    async fn extend_duration(&self, _id: &str, _extra_secs: u64) -> StoreResult<u64> {
        down()
    }

    async fn set_activation_time_if_unset(
        &self,
        _id: &str,
        _at: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>> {
        down()
    }

    async fn get_session(&self, _account_id: &str) -> StoreResult<Option<Session>> {
        down()
    }

    async fn establish_session(
        &self,
        _account_id: &str,
        _device_id: &str,
        _token: &str,
        _at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        down()
    }

    async fn rotate_session(
        &self,
        _account_id: &str,
        _device_id: &str,
        _current_token: &str,
        _new_token: &str,
        _at: DateTime<Utc>,
    ) -> StoreResult<Option<Session>> {
        down()
    }

    async fn ping(&self) -> StoreResult<()> {
        down()
    }
}

/// A memory store where another device logs in right before every token
/// rotation reaches the store.
#[derive(Default)]
pub struct LoginDuringRefreshStore {
    inner: MemoryStore,
}

pub const INTRUDER_DEVICE: &str = "intruder";
pub const INTRUDER_TOKEN: &str = "intruder-token";

#[async_trait]
impl AccountStore for LoginDuringRefreshStore {
    async fn get_account(&self, id: &str) -> StoreResult<Account> {
        self.inner.get_account(id).await
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        self.inner.insert_account(account).await
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountSummary>> {
        self.inner.list_accounts().await
    }

    async fn delete_account(&self, id: &str) -> StoreResult<()> {
        self.inner.delete_account(id).await
    }

    async fn extend_duration(&self, id: &str, extra_secs: u64) -> StoreResult<u64> {
        self.inner.extend_duration(id, extra_secs).await
    }

    async fn set_activation_time_if_unset(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>> {
        self.inner.set_activation_time_if_unset(id, at).await
    }

    async fn get_session(&self, account_id: &str) -> StoreResult<Option<Session>> {
        self.inner.get_session(account_id).await
    }

    async fn establish_session(
        &self,
        account_id: &str,
        device_id: &str,
        token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        self.inner
            .establish_session(account_id, device_id, token, at)
            .await
    }

    async fn rotate_session(
        &self,
        account_id: &str,
        device_id: &str,
        current_token: &str,
        new_token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Session>> {
        self.inner
            .establish_session(account_id, INTRUDER_DEVICE, INTRUDER_TOKEN, at)
            .await?;
        self.inner
            .rotate_session(account_id, device_id, current_token, new_token, at)
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}
