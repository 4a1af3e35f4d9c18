//! JSON request and response bodies shared by the server and the admin CLI.

use chrono::{DateTime, Utc};
use seatlock_session::{LicenseCheck, SessionGrant};
use seatlock_store::AccountSummary;
use serde::{Deserialize, Serialize};

pub const DEVICE_ID_HEADER: &str = "x-device-id";
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

// ── Client API ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub account_id: String,
    pub password: String,
    pub device_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GrantResponse {
    pub token: String,
    pub remaining_seconds: u64,
}

impl From<SessionGrant> for GrantResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            token: grant.token,
            remaining_seconds: grant.remaining_secs,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckResponse {
    pub account_id: String,
    pub remaining_seconds: u64,
}

impl From<LicenseCheck> for CheckResponse {
    fn from(check: LicenseCheck) -> Self {
        Self {
            account_id: check.account_id,
            remaining_seconds: check.remaining_secs,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidateRequest {
    pub account_id: String,
    pub device_id: String,
    pub token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

// ── Admin API ───────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone)]
pub struct CreateAccountRequest {
    pub account_id: String,
    pub password: String,
    pub duration_seconds: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtendRequest {
    pub extra_seconds: u64,
}

/// An account's total license duration after a create or extend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountDurationResponse {
    pub account_id: String,
    pub duration_seconds: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountView {
    pub account_id: String,
    pub duration_seconds: u64,
    /// `None` until the first successful login.
    pub activated_at: Option<DateTime<Utc>>,
}

impl From<AccountSummary> for AccountView {
    fn from(summary: AccountSummary) -> Self {
        Self {
            account_id: summary.id,
            duration_seconds: summary.duration_secs,
            activated_at: summary.activated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeletedResponse {
    pub account_id: String,
}

// ── Errors ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable category, e.g. `session_superseded`.
    pub error: String,
    pub message: String,
}
