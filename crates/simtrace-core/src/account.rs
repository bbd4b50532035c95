//! Operator account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role assigned to an account.
///
/// Admins may manage the account roster; regular users may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including account management.
    Admin,
    /// Regular operator.
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role '{}', expected 'admin' or 'user'", other)),
        }
    }
}

/// A public account record.
///
/// The credential secret is deliberately not part of this type; it lives
/// only inside the identity store's roster entries and never crosses the
/// query API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID.
    pub id: Uuid,

    /// Login name (unique across the roster, case-sensitive).
    pub username: String,

    /// Display alias.
    pub alias: String,

    /// Assigned role.
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Case-insensitive substring match against alias or username.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.alias.to_lowercase().contains(needle_lower)
            || self.username.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_account_matches() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "user1".to_string(),
            alias: "Field Agent Alpha".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };

        assert!(account.matches("alpha"));
        assert!(account.matches("USER1".to_lowercase().as_str()));
        assert!(account.matches(""));
        assert!(!account.matches("beta"));
    }
}
