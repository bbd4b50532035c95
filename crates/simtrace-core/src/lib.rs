//! # simtrace-core
//!
//! Shared data model and configuration types for Simtrace.
//!
//! This crate provides:
//! - Account and role types for the identity store
//! - SIM device and location observation types for the device store
//! - Configuration loading (`simtrace.yaml`) and seed datasets
//!
//! All identifiers are UUIDs and all timestamps are UTC. Nothing in this
//! crate holds state; the stores live in `simtrace-auth` and
//! `simtrace-store`.

pub mod account;
pub mod config;
pub mod location;
pub mod sim;

pub use account::{Account, Role};
pub use config::{ConfigError, SeedAccount, SeedData, SimtraceConfig};
pub use location::LocationEntry;
pub use sim::{LastLocation, NewSim, SimCard, SimPatch, SimStatus};
