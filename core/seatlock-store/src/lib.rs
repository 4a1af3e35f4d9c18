//! Account and session storage for Seatlock.
//!
//! The license core never keeps authoritative state in memory between
//! requests. Everything it needs lives behind [`AccountStore`]:
//!
//! - Accounts: credential hash, total license duration, activation time
//! - Sessions: one row per account holding the single live device and token
//!
//! # Atomicity contract
//!
//! Implementations must make two operations atomic per account:
//! - [`AccountStore::set_activation_time_if_unset`] is a compare-and-set on
//!   null; concurrent first logins all observe the same activation time.
//! - [`AccountStore::establish_session`] is a single upsert keyed by account;
//!   the last write ordered by the store wins and no two sessions coexist.
//! - [`AccountStore::rotate_session`] is a compare-and-swap on the live
//!   `(device, token)` pair, so a refresh never undoes a newer login.

mod error;
mod memory;
mod model;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use model::{Account, AccountSummary, NewAccount, Session};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable storage for accounts and their single live session.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetches an account by ID.
    async fn get_account(&self, id: &str) -> StoreResult<Account>;

    /// Inserts a new account. Fails with [`StoreError::AlreadyExists`] on a duplicate ID.
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account>;

    /// Lists every account, ordered by ID.
    async fn list_accounts(&self) -> StoreResult<Vec<AccountSummary>>;

    /// Deletes an account together with its session.
    async fn delete_account(&self, id: &str) -> StoreResult<()>;

    /// Adds `extra_secs` to the total duration and returns the new total.
    ///
    /// Saturates instead of overflowing. Never touches the activation time.
    async fn extend_duration(&self, id: &str, extra_secs: u64) -> StoreResult<u64>;

    /// Sets the activation time to `at` only if it is still unset.
    ///
    /// Returns the activation time in effect afterwards, which is the
    /// pre-existing one if another login got there first.
    async fn set_activation_time_if_unset(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>>;

    /// Returns the live session for an account, if any.
    async fn get_session(&self, account_id: &str) -> StoreResult<Option<Session>>;

    /// Replaces whatever session the account had with `(device_id, token)`.
    async fn establish_session(
        &self,
        account_id: &str,
        device_id: &str,
        token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Session>;

    /// Swaps the live token for `new_token`, but only while the live session
    /// is still exactly `(device_id, current_token)`.
    ///
    /// Returns `None` and changes nothing if another login replaced the
    /// session in the meantime.
    async fn rotate_session(
        &self,
        account_id: &str,
        device_id: &str,
        current_token: &str,
        new_token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Session>>;

    /// Cheap liveness check.
    async fn ping(&self) -> StoreResult<()>;
}
