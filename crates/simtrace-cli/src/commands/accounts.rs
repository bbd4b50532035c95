//! Account management commands.
//!
//! `simtrace accounts list` - List all accounts.
//! `simtrace accounts search <query>` - Substring search over alias/username.
//! `simtrace accounts add` / `delete` - Admin-only roster mutations.

use anyhow::Result;
use clap::Subcommand;
use simtrace_auth::AuthStore;
use simtrace_core::{Account, Role};
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    /// List all accounts.
    List,

    /// Search accounts by alias or username.
    Search { query: String },

    /// Create an account (admin only).
    Add {
        username: String,
        secret: String,
        /// Display alias.
        #[arg(long)]
        alias: String,
        /// Role: 'admin' or 'user'.
        #[arg(long, default_value = "user")]
        role: Role,
    },

    /// Delete an account by ID (admin only, not yourself).
    Delete { id: Uuid },
}

pub fn run(auth: &mut AuthStore, cmd: AccountsCommand) -> Result<()> {
    match cmd {
        AccountsCommand::List => print_accounts(&auth.accounts()),
        AccountsCommand::Search { query } => print_accounts(&auth.search_accounts(&query)),
        AccountsCommand::Add {
            username,
            secret,
            alias,
            role,
        } => {
            let account = auth.create_account(&username, &secret, &alias, role)?;
            println!("Created account '{}' ({})", account.username, account.id);
        }
        AccountsCommand::Delete { id } => {
            auth.delete_account(id)?;
            println!("Deleted account {}", id);
        }
    }
    Ok(())
}

fn print_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found");
        return;
    }
    for account in accounts {
        println!(
            "{}  {:<12} {:<8} {}",
            account.id, account.username, account.role, account.alias
        );
    }
}
