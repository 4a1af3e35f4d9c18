//! HTTP client for the admin API, used by `seatlock-admin`.

use crate::api::{
    AccountDurationResponse, AccountView, CreateAccountRequest, DeletedResponse, ErrorBody,
    ExtendRequest, ADMIN_KEY_HEADER,
};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

pub struct AdminClient {
    http: reqwest::Client,
    base: Url,
    admin_key: String,
}

impl AdminClient {
    pub fn new(base_url: &str, admin_key: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid server URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            bail!("invalid server URL: {base_url}");
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            admin_key: admin_key.into(),
        })
    }

    pub async fn create_account(
        &self,
        account_id: &str,
        password: &str,
        duration_seconds: u64,
    ) -> Result<AccountDurationResponse> {
        let body = CreateAccountRequest {
            account_id: account_id.to_string(),
            password: password.to_string(),
            duration_seconds,
        };
        let resp = self
            .http
            .post(self.url(&["admin", "accounts"])?)
            .header(ADMIN_KEY_HEADER, &self.admin_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach server")?;
        decode(resp).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<AccountView>> {
        let resp = self
            .http
            .get(self.url(&["admin", "accounts"])?)
            .header(ADMIN_KEY_HEADER, &self.admin_key)
            .send()
            .await
            .context("failed to reach server")?;
        decode(resp).await
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<DeletedResponse> {
        let resp = self
            .http
            .delete(self.url(&["admin", "accounts", account_id])?)
            .header(ADMIN_KEY_HEADER, &self.admin_key)
            .send()
            .await
            .context("failed to reach server")?;
        decode(resp).await
    }

    pub async fn extend_account(
        &self,
        account_id: &str,
        extra_seconds: u64,
    ) -> Result<AccountDurationResponse> {
        let resp = self
            .http
            .post(self.url(&["admin", "accounts", account_id, "extend"])?)
            .header(ADMIN_KEY_HEADER, &self.admin_key)
            .json(&ExtendRequest { extra_seconds })
            .send()
            .await
            .context("failed to reach server")?;
        decode(resp).await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid server URL: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.context("unexpected response body");
    }
    match resp.json::<ErrorBody>().await {
        Ok(body) => bail!("{} ({status}): {}", body.error, body.message),
        Err(_) => bail!("server returned {status}"),
    }
}
