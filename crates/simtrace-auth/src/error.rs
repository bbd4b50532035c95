//! Error types for the identity store.

use simtrace_core::Role;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during identity operations.
///
/// Every failure leaves the store unchanged; there are no partial
/// mutations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/secret pair did not match any roster entry.
    #[error("invalid username or secret")]
    InvalidCredentials,

    /// The current account lacks the required role (or nobody is logged in).
    #[error("permission denied: requires role '{required}'")]
    PermissionDenied { required: Role },

    /// The username is already taken (case-sensitive).
    #[error("username '{username}' already exists")]
    UsernameTaken { username: String },

    /// The current account tried to delete itself.
    #[error("cannot delete the currently logged-in account")]
    SelfDeletion,

    /// No account with the given ID exists.
    #[error("no account with id {id}")]
    AccountNotFound { id: Uuid },

    /// Failed to read or write the session record.
    #[error("session record error: {0}")]
    Session(String),
}
