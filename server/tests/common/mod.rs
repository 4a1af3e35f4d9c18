#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use seatlock_license::{ManualClock, TokenIssuer};
use seatlock_server::api::{
    CreateAccountRequest, GrantResponse, LoginRequest, ADMIN_KEY_HEADER, DEVICE_ID_HEADER,
};
use seatlock_server::config::{ServerConfig, StorageConfig};
use seatlock_server::{build_router, AppState};
use seatlock_session::{Argon2Credentials, KdfParams};
use seatlock_store::{
    Account, AccountStore, AccountSummary, MemoryStore, NewAccount, Session, StoreError,
    StoreResult,
};
use std::sync::Arc;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const PASSWORD: &str = "hunter2";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub struct TestServer {
    pub base: String,
    pub clock: Arc<ManualClock>,
    pub http: reqwest::Client,
}

/// Spin up the HTTP server on an OS-assigned port with an in-memory store.
pub async fn spawn_test_server() -> TestServer {
    spawn_with_store(Arc::new(MemoryStore::new())).await
}

pub async fn spawn_with_store(store: Arc<dyn AccountStore>) -> TestServer {
    let mut config = ServerConfig::new(ADMIN_KEY);
    config.storage = StorageConfig::Memory;

    let clock = Arc::new(ManualClock::new(t0()));
    let credentials = Arc::new(Argon2Credentials::new(&KdfParams::testing()).unwrap());
    let state = AppState::new(
        &config,
        store,
        Arc::new(TokenIssuer::generate()),
        clock.clone(),
        credentials,
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        clock,
        http: reqwest::Client::new(),
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn create_account(&self, account_id: &str, duration_seconds: u64) {
        let resp = self
            .http
            .post(self.url("/admin/accounts"))
            .header(ADMIN_KEY_HEADER, ADMIN_KEY)
            .json(&CreateAccountRequest {
                account_id: account_id.to_string(),
                password: PASSWORD.to_string(),
                duration_seconds,
            })
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    pub async fn login(&self, account_id: &str, device_id: &str) -> reqwest::Response {
        self.http
            .post(self.url("/api/v1/login"))
            .json(&LoginRequest {
                account_id: account_id.to_string(),
                password: PASSWORD.to_string(),
                device_id: device_id.to_string(),
            })
            .send()
            .await
            .unwrap()
    }

    pub async fn login_ok(&self, account_id: &str, device_id: &str) -> GrantResponse {
        let resp = self.login(account_id, device_id).await;
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    pub async fn check(&self, token: &str, device_id: &str) -> reqwest::Response {
        self.http
            .get(self.url("/api/v1/check"))
            .bearer_auth(token)
            .header(DEVICE_ID_HEADER, device_id)
            .send()
            .await
            .unwrap()
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
