//! Stored records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered account and its license term.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique, stable account ID (the login name).
    pub id: String,
    /// Opaque one-way credential (a PHC string).
    pub credential_hash: String,
    /// Total license length in seconds. Only grows, via extension.
    pub duration_secs: u64,
    /// Set once on first successful login, never changed afterwards.
    pub activated_at: Option<DateTime<Utc>>,
    /// When the account was provisioned.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns the admin-facing view of the account.
    #[must_use]
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            duration_secs: self.duration_secs,
            activated_at: self.activated_at,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("credential_hash", &"[REDACTED]")
            .field("duration_secs", &self.duration_secs)
            .field("activated_at", &self.activated_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for provisioning an account.
#[derive(Clone)]
pub struct NewAccount {
    pub id: String,
    pub credential_hash: String,
    pub duration_secs: u64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("id", &self.id)
            .field("duration_secs", &self.duration_secs)
            .finish_non_exhaustive()
    }
}

/// What admin listings show. Never includes the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub duration_secs: u64,
    pub activated_at: Option<DateTime<Utc>>,
}

/// The single live session of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account_id: String,
    pub device_id: String,
    pub token: String,
    pub established_at: DateTime<Utc>,
}
