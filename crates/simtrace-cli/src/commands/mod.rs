//! CLI command implementations for the Simtrace console.

pub mod accounts;
pub mod history;
pub mod session;
pub mod sims;
