//! Seatlock license server.
//!
//! Serves the client license API and the admin API over HTTP.
//!
//! Usage:
//!   SEATLOCK_ADMIN_KEY=... seatlock-server --port 8080 --db seatlock.db
//!
//! The token signing key is generated on first run and reused after that;
//! deleting it logs every client out.

use std::{fs, net::IpAddr, path::Path, path::PathBuf, sync::Arc};
use anyhow::{bail, Context, Result};
use clap::Parser;
use seatlock_license::{SystemClock, TokenIssuer};
use seatlock_server::config::{
    ServerConfig, StorageConfig, DEFAULT_DB_PATH, DEFAULT_PORT, DEFAULT_SIGNING_KEY_PATH,
};
use seatlock_server::{build_router, AppState};
use seatlock_session::{Argon2Credentials, KdfParams};
use seatlock_store::{AccountStore, MemoryStore, SqliteStore};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "seatlock-server")]
#[command(about = "Seatlock license and single-device session server", version)]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, env = "SEATLOCK_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "SEATLOCK_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Path to the SQLite database
    #[arg(long, env = "SEATLOCK_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Keep everything in memory instead of SQLite
    #[arg(long)]
    memory: bool,

    /// Path to the token signing key file
    #[arg(short = 'k', long, env = "SEATLOCK_SIGNING_KEY", default_value = DEFAULT_SIGNING_KEY_PATH)]
    signing_key: PathBuf,

    /// Shared secret for the admin API
    #[arg(long, env = "SEATLOCK_ADMIN_KEY", hide_env_values = true)]
    admin_key: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            port: self.port,
            storage: if self.memory {
                StorageConfig::Memory
            } else {
                StorageConfig::Sqlite(self.db)
            },
            signing_key: self.signing_key,
            admin_key: self.admin_key,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = args.into_config();
    if config.admin_key.trim().is_empty() {
        bail!("admin key must not be empty");
    }

    info!("Seatlock server starting...");
    let issuer = Arc::new(load_or_generate_signing_key(&config.signing_key)?);
    let store = open_store(&config.storage)?;
    let credentials = Arc::new(
        Argon2Credentials::new(&KdfParams::default()).context("Invalid Argon2 parameters")?,
    );

    let state = AppState::new(&config, store, issuer, Arc::new(SystemClock), credentials);
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("\n========================================");
    println!("  Seatlock Server Running");
    println!("========================================");
    println!("  Listening: http://{addr}");
    println!("  Storage:   {}", config.storage);
    println!("  Key file:  {}", config.signing_key.display());
    println!("========================================\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Seatlock server stopped");
    Ok(())
}

fn open_store(storage: &StorageConfig) -> Result<Arc<dyn AccountStore>> {
    match storage {
        StorageConfig::Sqlite(path) => {
            info!("Opening database at {:?}", path);
            let store = SqliteStore::open(path)
                .with_context(|| format!("Failed to open database {}", path.display()))?;
            Ok(Arc::new(store))
        }
        StorageConfig::Memory => {
            warn!("Using in-memory storage; accounts are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn load_or_generate_signing_key(path: &Path) -> Result<TokenIssuer> {
    if path.exists() {
        info!("Loading signing key from {:?}", path);
        let bytes = fs::read(path).context("Failed to read signing key file")?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .context("Signing key file must hold exactly 32 bytes")?;
        Ok(TokenIssuer::from_seed(&seed))
    } else {
        info!("Generating new signing key at {:?}", path);
        let issuer = TokenIssuer::generate();
        fs::write(path, issuer.seed()).context("Failed to write signing key file")?;
        restrict_permissions(path)?;
        Ok(issuer)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .context("Failed to restrict signing key permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
