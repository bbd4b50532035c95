//! Role policy checks.
//!
//! Privileged operations call [`require_role`] before touching any state,
//! so a denied caller observes no mutation at all.

use crate::error::AuthError;
use simtrace_core::{Account, Role};

/// Validate that `current` is a logged-in account holding `required`.
///
/// Returns the account on success so callers can use its identity (for
/// example the self-deletion check).
pub fn require_role(current: Option<&Account>, required: Role) -> Result<&Account, AuthError> {
    match current {
        Some(account) if account.role == required => Ok(account),
        Some(account) => {
            tracing::debug!(
                "account '{}' with role '{}' denied, requires '{}'",
                account.username,
                account.role,
                required
            );
            Err(AuthError::PermissionDenied { required })
        }
        None => Err(AuthError::PermissionDenied { required }),
    }
}
