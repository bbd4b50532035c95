//! The account roster and current-session state.

use crate::error::AuthError;
use crate::policy::require_role;
use crate::session::SessionFile;
use chrono::Utc;
use simtrace_core::{Account, Role, SeedAccount};
use uuid::Uuid;

/// One roster entry: the public account plus its secret.
///
/// Secrets are compared in plaintext, matching the system this models;
/// see DESIGN.md for why this is kept.
#[derive(Debug, Clone)]
struct AccountEntry {
    account: Account,
    secret: String,
}

/// The identity store.
///
/// Owns the account roster and the current session. Constructed by the
/// composition root from an injected seed dataset; there are no ambient
/// globals.
#[derive(Debug)]
pub struct AuthStore {
    entries: Vec<AccountEntry>,
    current: Option<Account>,
    session: SessionFile,
}

impl AuthStore {
    /// Build the store from seeded accounts, restoring any saved session.
    pub fn new(
        seed: Vec<SeedAccount>,
        session_path: impl Into<std::path::PathBuf>,
    ) -> Result<Self, AuthError> {
        let session = SessionFile::new(session_path);
        let current = session.load()?;
        if let Some(account) = &current {
            tracing::info!("restored session for '{}'", account.username);
        }

        let entries = seed
            .into_iter()
            .map(|sa| AccountEntry {
                account: sa.account,
                secret: sa.secret,
            })
            .collect();

        Ok(Self {
            entries,
            current,
            session,
        })
    }

    /// The currently logged-in account, if any.
    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// All accounts, secrets stripped, roster order.
    pub fn accounts(&self) -> Vec<Account> {
        self.entries.iter().map(|e| e.account.clone()).collect()
    }

    /// Log in with a username and secret.
    ///
    /// On success the account becomes current and the session record is
    /// written. On failure nothing changes.
    pub fn login(&mut self, username: &str, secret: &str) -> Result<Account, AuthError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.account.username == username && e.secret == secret)
            .ok_or_else(|| {
                tracing::warn!("failed login attempt for '{}'", username);
                AuthError::InvalidCredentials
            })?;

        let account = entry.account.clone();
        self.session.save(&account)?;
        self.current = Some(account.clone());
        tracing::info!("'{}' logged in", account.username);
        Ok(account)
    }

    /// Log out: clear the current account and the session record.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        if let Some(account) = self.current.take() {
            tracing::info!("'{}' logged out", account.username);
        }
        self.session.clear()
    }

    /// Create a new account. Admin only; usernames are unique
    /// (case-sensitive).
    pub fn create_account(
        &mut self,
        username: &str,
        secret: &str,
        alias: &str,
        role: Role,
    ) -> Result<Account, AuthError> {
        require_role(self.current.as_ref(), Role::Admin)?;

        if self.entries.iter().any(|e| e.account.username == username) {
            return Err(AuthError::UsernameTaken {
                username: username.to_string(),
            });
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            alias: alias.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.entries.push(AccountEntry {
            account: account.clone(),
            secret: secret.to_string(),
        });
        tracing::info!("created account '{}' with role '{}'", username, role);
        Ok(account)
    }

    /// Delete an account by ID. Admin only; self-deletion is forbidden.
    /// No cascade: accounts and devices are not linked.
    pub fn delete_account(&mut self, id: Uuid) -> Result<(), AuthError> {
        let caller = require_role(self.current.as_ref(), Role::Admin)?;
        if caller.id == id {
            return Err(AuthError::SelfDeletion);
        }

        let before = self.entries.len();
        self.entries.retain(|e| e.account.id != id);
        if self.entries.len() == before {
            return Err(AuthError::AccountNotFound { id });
        }
        tracing::info!("deleted account {}", id);
        Ok(())
    }

    /// Case-insensitive substring search over alias and username.
    ///
    /// An empty query matches the whole roster. Order is preserved and
    /// secrets are stripped.
    pub fn search_accounts(&self, query: &str) -> Vec<Account> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.account.matches(&needle))
            .map(|e| e.account.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtrace_core::SeedData;
    use tempfile::TempDir;

    fn store() -> (AuthStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = AuthStore::new(SeedData::demo().accounts, dir.path().join("session.yaml"))
            .unwrap();
        (store, dir)
    }

    #[test]
    fn test_every_seeded_account_can_log_in() {
        let (mut store, _dir) = store();
        let seed = SeedData::demo();

        for sa in &seed.accounts {
            let account = store.login(&sa.account.username, &sa.secret).unwrap();
            assert_eq!(account.username, sa.account.username);
            assert_eq!(store.current().unwrap().username, sa.account.username);
        }
    }

    #[test]
    fn test_bad_credentials_leave_state_unchanged() {
        let (mut store, _dir) = store();

        assert!(matches!(
            store.login("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("nobody", "admin123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");

        let mut store = AuthStore::new(SeedData::demo().accounts, &path).unwrap();
        store.login("admin", "admin123").unwrap();
        drop(store);

        let restored = AuthStore::new(SeedData::demo().accounts, &path).unwrap();
        assert_eq!(restored.current().unwrap().username, "admin");
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");

        let mut store = AuthStore::new(SeedData::demo().accounts, &path).unwrap();
        store.login("admin", "admin123").unwrap();
        store.logout().unwrap();
        assert!(store.current().is_none());

        let restored = AuthStore::new(SeedData::demo().accounts, &path).unwrap();
        assert!(restored.current().is_none());
    }

    #[test]
    fn test_create_account_requires_admin() {
        let (mut store, _dir) = store();

        // Logged out.
        assert!(matches!(
            store.create_account("new", "pw", "New", Role::User),
            Err(AuthError::PermissionDenied { .. })
        ));

        // Regular user.
        store.login("user1", "user123").unwrap();
        assert!(matches!(
            store.create_account("new", "pw", "New", Role::User),
            Err(AuthError::PermissionDenied { .. })
        ));

        // Admin.
        store.login("admin", "admin123").unwrap();
        let account = store
            .create_account("new", "pw", "New Agent", Role::User)
            .unwrap();
        assert_eq!(account.username, "new");
        assert_eq!(store.accounts().len(), 4);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (mut store, _dir) = store();
        store.login("admin", "admin123").unwrap();

        let err = store
            .create_account("user1", "pw", "Duplicate", Role::User)
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken { .. }));
        assert_eq!(store.accounts().len(), 3);

        // Uniqueness is case-sensitive: a differently-cased name is new.
        store
            .create_account("User1", "pw", "Cased", Role::User)
            .unwrap();
        assert_eq!(store.accounts().len(), 4);
    }

    #[test]
    fn test_self_deletion_forbidden() {
        let (mut store, _dir) = store();
        let admin = store.login("admin", "admin123").unwrap();

        assert!(matches!(
            store.delete_account(admin.id),
            Err(AuthError::SelfDeletion)
        ));
        assert_eq!(store.accounts().len(), 3);
    }

    #[test]
    fn test_delete_account() {
        let (mut store, _dir) = store();
        store.login("admin", "admin123").unwrap();

        let target = store
            .accounts()
            .into_iter()
            .find(|a| a.username == "user2")
            .unwrap();
        store.delete_account(target.id).unwrap();
        assert_eq!(store.accounts().len(), 2);

        assert!(matches!(
            store.delete_account(target.id),
            Err(AuthError::AccountNotFound { .. })
        ));
    }

    #[test]
    fn test_search_accounts() {
        let (store, _dir) = store();

        let agents = store.search_accounts("field agent");
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].alias, "Field Agent Alpha");

        let by_username = store.search_accounts("ADMIN");
        assert_eq!(by_username.len(), 1);

        // Empty query returns the whole roster in order.
        let all = store.search_accounts("");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].username, "admin");
    }
}
