//! SQLite-backed store.
//!
//! Timestamps are stored as milliseconds since the Unix epoch. Every call
//! runs on the blocking pool with the connection mutex held for the whole
//! statement sequence, which is what makes activation and session
//! establishment atomic.

use crate::error::{StoreError, StoreResult};
use crate::model::{Account, AccountSummary, NewAccount, Session};
use crate::AccountStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Persistent account store backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened account store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                credential_hash TEXT NOT NULL,
                duration_secs INTEGER NOT NULL CHECK (duration_secs >= 0),
                activated_at INTEGER,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                account_id TEXT PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
                device_id TEXT NOT NULL,
                token TEXT NOT NULL,
                established_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("blocking task failed: {e}")))?
    }
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {ms}")))
}

fn to_sql_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

fn from_sql_secs(secs: i64) -> StoreResult<u64> {
    u64::try_from(secs).map_err(|_| StoreError::InvalidData(format!("negative duration: {secs}")))
}

type AccountRow = (String, String, i64, Option<i64>, i64);

const ACCOUNT_COLUMNS: &str = "id, credential_hash, duration_secs, activated_at, created_at";

fn read_account_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn account_from_row(row: AccountRow) -> StoreResult<Account> {
    let (id, credential_hash, duration, activated_at, created_at) = row;
    Ok(Account {
        id,
        credential_hash,
        duration_secs: from_sql_secs(duration)?,
        activated_at: activated_at.map(from_millis).transpose()?,
        created_at: from_millis(created_at)?,
    })
}

fn load_account(conn: &Connection, id: &str) -> StoreResult<Account> {
    let row = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
            params![id],
            read_account_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    account_from_row(row)
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn get_account(&self, id: &str) -> StoreResult<Account> {
        let id = id.to_string();
        self.with_conn(move |conn| load_account(conn, &id)).await
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO accounts (id, credential_hash, duration_secs, activated_at, created_at)
                 VALUES (?1, ?2, ?3, NULL, ?4)",
                params![
                    account.id,
                    account.credential_hash,
                    to_sql_secs(account.duration_secs),
                    to_millis(account.created_at),
                ],
            )?;
            if inserted == 0 {
                return Err(StoreError::AlreadyExists(account.id));
            }
            load_account(conn, &account.id)
        })
        .await
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
            ))?;
            let rows = stmt.query_map([], read_account_row)?;

            let mut result = Vec::new();
            for row in rows {
                result.push(account_from_row(row?)?.summary());
            }
            Ok(result)
        })
        .await
    }

    async fn delete_account(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM sessions WHERE account_id = ?1", params![id])?;
            let deleted = tx.execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(id));
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn extend_duration(&self, id: &str, extra_secs: u64) -> StoreResult<u64> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let current: i64 = tx
                .query_row(
                    "SELECT duration_secs FROM accounts WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let updated = from_sql_secs(current)?
                .saturating_add(extra_secs)
                .min(i64::MAX as u64);
            tx.execute(
                "UPDATE accounts SET duration_secs = ?2 WHERE id = ?1",
                params![id, to_sql_secs(updated)],
            )?;
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    async fn set_activation_time_if_unset(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE accounts SET activated_at = ?2 WHERE id = ?1 AND activated_at IS NULL",
                params![id, to_millis(at)],
            )?;
            let activated_at: Option<i64> = conn
                .query_row(
                    "SELECT activated_at FROM accounts WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let activated_at = activated_at
                .ok_or_else(|| StoreError::InvalidData(format!("activation not recorded for {id}")))?;
            from_millis(activated_at)
        })
        .await
    }

    async fn get_session(&self, account_id: &str) -> StoreResult<Option<Session>> {
        let account_id = account_id.to_string();
        self.with_conn(move |conn| {
            let row: Option<(String, String, String, i64)> = conn
                .query_row(
                    "SELECT account_id, device_id, token, established_at FROM sessions WHERE account_id = ?1",
                    params![account_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
                .optional()?;
            row.map(|(account_id, device_id, token, established_at)| {
                Ok(Session {
                    account_id,
                    device_id,
                    token,
                    established_at: from_millis(established_at)?,
                })
            })
            .transpose()
        })
        .await
    }

    async fn establish_session(
        &self,
        account_id: &str,
        device_id: &str,
        token: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let account_id = account_id.to_string();
        let device_id = device_id.to_string();
        let token = token.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM accounts WHERE id = ?1",
                    params![account_id],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::NotFound(account_id));
            }
            tx.execute(
                "INSERT INTO sessions (account_id, device_id, token, established_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(account_id) DO UPDATE SET
                    device_id = excluded.device_id,
                    token = excluded.token,
                    established_at = excluded.established_at",
                params![account_id, device_id, token, to_millis(at)],
            )?;
            tx.commit()?;
            Ok(Session {
                account_id,
                device_id,
                token,
                established_at: from_millis(to_millis(at))?,
            })
        })
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
        let account_id = account_id.to_string();
        let device_id = device_id.to_string();
        let current_token = current_token.to_string();
        let new_token = new_token.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE sessions SET token = ?1, established_at = ?2
                 WHERE account_id = ?3 AND device_id = ?4 AND token = ?5",
                params![new_token, to_millis(at), account_id, device_id, current_token],
            )?;
            if changed == 0 {
                debug!(account = %account_id, "session rotation lost to a newer session");
                return Ok(None);
            }
            Ok(Some(Session {
                account_id,
                device_id,
                token: new_token,
                established_at: from_millis(to_millis(at))?,
            }))
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
