//! Session commands: login, logout, whoami.

use anyhow::Result;
use simtrace_auth::AuthStore;

pub fn login(auth: &mut AuthStore, username: &str, secret: &str) -> Result<()> {
    let account = auth.login(username, secret)?;
    println!(
        "Logged in as '{}' ({}, role {})",
        account.username, account.alias, account.role
    );
    Ok(())
}

pub fn logout(auth: &mut AuthStore) -> Result<()> {
    auth.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(auth: &AuthStore) {
    match auth.current() {
        Some(account) => println!(
            "{} ({}, role {}, since {})",
            account.username,
            account.alias,
            account.role,
            account.created_at.format("%Y-%m-%d")
        ),
        None => println!("Not logged in"),
    }
}
