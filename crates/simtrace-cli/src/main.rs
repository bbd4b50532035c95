//! Simtrace CLI.
//!
//! The composition root: loads configuration, seeds the identity and
//! device stores, and dispatches subcommands. Device data is in-memory
//! mock state reseeded on every run; only the operator session is durable.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use simtrace_auth::AuthStore;
use simtrace_core::SimtraceConfig;
use simtrace_store::SimStore;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "simtrace", version, about = "SIM device tracking console")]
struct Cli {
    /// Path to the configuration file. Defaults are used when it is absent.
    #[arg(long, global = true, default_value = "simtrace.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as an operator.
    Login {
        username: String,
        secret: String,
    },

    /// Log out and clear the saved session.
    Logout,

    /// Show the current operator.
    Whoami,

    /// Account management (admin only for mutations).
    Accounts {
        #[command(subcommand)]
        cmd: commands::accounts::AccountsCommand,
    },

    /// Device roster management.
    Sims {
        #[command(subcommand)]
        cmd: commands::sims::SimsCommand,
    },

    /// Request a tracking fix for a device and wait for it to land.
    Track {
        id: Uuid,
    },

    /// Location observation log.
    History {
        #[command(subcommand)]
        cmd: commands::history::HistoryCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        SimtraceConfig::load(&cli.config)?
    } else {
        tracing::debug!("{} not found, using defaults", cli.config.display());
        SimtraceConfig::default()
    };

    let seed = config.seed_data()?;
    let mut auth = AuthStore::new(seed.accounts, config.session_file.clone())?;
    let store = SimStore::new(
        seed.sims,
        seed.history,
        Duration::from_millis(config.tracking_delay_ms),
    );

    match cli.cmd {
        Command::Login { username, secret } => commands::session::login(&mut auth, &username, &secret)?,
        Command::Logout => commands::session::logout(&mut auth)?,
        Command::Whoami => commands::session::whoami(&auth),

        Command::Accounts { cmd } => commands::accounts::run(&mut auth, cmd)?,
        Command::Sims { cmd } => commands::sims::run(&store, cmd)?,
        Command::Track { id } => {
            commands::sims::track(&store, id, Duration::from_millis(config.tracking_delay_ms))
                .await?
        }
        Command::History { cmd } => commands::history::run(&store, cmd)?,
    }

    Ok(())
}
