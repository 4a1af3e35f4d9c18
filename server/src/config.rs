//! Resolved server configuration.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "seatlock.db";
pub const DEFAULT_SIGNING_KEY_PATH: &str = "seatlock-signing.key";

/// Where accounts and sessions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite(PathBuf),
    /// Lost on restart. For local testing.
    Memory,
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub storage: StorageConfig,
    /// File holding the 32-byte Ed25519 seed used to sign tokens.
    pub signing_key: PathBuf,
    /// Shared secret for the admin API. An empty key locks the admin API.
    pub admin_key: String,
}

impl ServerConfig {
    /// Defaults for everything except the admin key.
    pub fn new(admin_key: impl Into<String>) -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            storage: StorageConfig::Sqlite(PathBuf::from(DEFAULT_DB_PATH)),
            signing_key: PathBuf::from(DEFAULT_SIGNING_KEY_PATH),
            admin_key: admin_key.into(),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("storage", &self.storage)
            .field("signing_key", &self.signing_key)
            .field("admin_key", &"<redacted>")
            .finish()
    }
}
