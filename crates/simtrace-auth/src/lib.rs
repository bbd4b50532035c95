//! # simtrace-auth
//!
//! Identity store for Simtrace.
//!
//! This crate provides:
//! - The account roster with login/logout and admin-gated management
//! - A role policy check applied at the start of privileged operations
//! - A durable session record so the current operator survives restarts
//!
//! ## Session Model
//!
//! At most one account is current at a time. A successful login sets the
//! current account (with the secret stripped) and writes a small YAML
//! record to disk; logout clears both. The record is reloaded once at
//! store construction without re-verifying the secret, matching the
//! behavior of the system this models.
//!
//! ## Example
//!
//! ```rust,no_run
//! use simtrace_auth::AuthStore;
//! use simtrace_core::SeedData;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let seed = SeedData::demo();
//! let mut store = AuthStore::new(seed.accounts, "session.yaml")?;
//!
//! let account = store.login("admin", "admin123")?;
//! assert_eq!(account.username, "admin");
//! store.logout()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod policy;
pub mod session;
pub mod store;

pub use error::AuthError;
pub use policy::require_role;
pub use session::SessionFile;
pub use store::AuthStore;
