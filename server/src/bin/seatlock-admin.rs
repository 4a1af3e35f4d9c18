//! Seatlock admin CLI.
//!
//! Durations are given and shown in minutes; the API works in seconds.
//!
//! Usage:
//!   seatlock-admin add alice --password s3cret --minutes 120
//!   seatlock-admin list
//!   seatlock-admin extend alice --minutes 30
//!   seatlock-admin remove alice

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seatlock_server::admin_client::AdminClient;

#[derive(Parser, Debug)]
#[command(name = "seatlock-admin")]
#[command(about = "Manage Seatlock accounts", version)]
struct Cli {
    /// Base URL of the Seatlock server
    #[arg(long, env = "SEATLOCK_URL", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Shared secret for the admin API
    #[arg(long, env = "SEATLOCK_ADMIN_KEY", hide_env_values = true)]
    admin_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Add {
        account_id: String,
        #[arg(long)]
        password: String,
        /// License length in minutes
        #[arg(long)]
        minutes: u64,
    },
    /// List accounts
    List,
    /// Delete an account and its session
    Remove { account_id: String },
    /// Add time to an account's license
    Extend {
        account_id: String,
        /// Minutes to add
        #[arg(long)]
        minutes: u64,
    },
}

fn minutes_to_secs(minutes: u64) -> Result<u64> {
    minutes
        .checked_mul(60)
        .context("duration too large")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = AdminClient::new(&cli.server, cli.admin_key)?;

    match cli.command {
        Command::Add {
            account_id,
            password,
            minutes,
        } => {
            let created = client
                .create_account(&account_id, &password, minutes_to_secs(minutes)?)
                .await?;
            println!(
                "Created {} ({} min)",
                created.account_id,
                created.duration_seconds / 60
            );
        }
        Command::List => {
            let accounts = client.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts");
                return Ok(());
            }
            println!("{:<32} {:>10}  {}", "ACCOUNT", "MINUTES", "ACTIVATED");
            for account in accounts {
                let activated = account
                    .activated_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:<32} {:>10}  {}",
                    account.account_id,
                    account.duration_seconds / 60,
                    activated
                );
            }
        }
        Command::Remove { account_id } => {
            let deleted = client.delete_account(&account_id).await?;
            println!("Removed {}", deleted.account_id);
        }
        Command::Extend {
            account_id,
            minutes,
        } => {
            let extended = client
                .extend_account(&account_id, minutes_to_secs(minutes)?)
                .await?;
            println!(
                "Extended {} to {} min total",
                extended.account_id,
                extended.duration_seconds / 60
            );
        }
    }

    Ok(())
}
