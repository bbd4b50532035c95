//! Durable session record.
//!
//! A single YAML file holding the public fields of the current account
//! (id, username, alias, role, created_at). The secret is never written.
//! Read once at store construction, written on login, removed on logout.

use crate::error::AuthError;
use simtrace_core::Account;
use std::fs;
use std::path::{Path, PathBuf};

/// Handle to the on-disk session record.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Create a handle for the given path. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session, if any.
    ///
    /// A missing file means "logged out" and is not an error. The saved
    /// account is trusted as-is; the secret is not re-verified.
    pub fn load(&self) -> Result<Option<Account>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AuthError::Session(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };

        let account = serde_yaml::from_str(&raw).map_err(|err| {
            AuthError::Session(format!("failed to parse {}: {}", self.path.display(), err))
        })?;
        Ok(Some(account))
    }

    /// Persist the current account.
    pub fn save(&self, account: &Account) -> Result<(), AuthError> {
        let yaml = serde_yaml::to_string(account)
            .map_err(|err| AuthError::Session(format!("failed to serialize session: {}", err)))?;
        fs::write(&self.path, yaml).map_err(|err| {
            AuthError::Session(format!(
                "failed to write {}: {}",
                self.path.display(),
                err
            ))
        })
    }

    /// Remove the record. Missing file is fine.
    pub fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Session(format!(
                "failed to remove {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use simtrace_core::Role;
    use uuid::Uuid;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            alias: "System Administrator".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionFile::new(dir.path().join("session.yaml"));
        let account = sample_account();

        session.save(&account).unwrap();
        let loaded = session.load().unwrap().unwrap();

        assert_eq!(loaded, account);
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionFile::new(dir.path().join("absent.yaml"));
        assert!(session.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionFile::new(dir.path().join("session.yaml"));

        session.save(&sample_account()).unwrap();
        session.clear().unwrap();
        session.clear().unwrap();
        assert!(session.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");
        fs::write(&path, "{not yaml: [").unwrap();

        let session = SessionFile::new(path);
        assert!(session.load().is_err());
    }
}
