//! # simtrace-store
//!
//! Device roster and location observation log for Simtrace.
//!
//! This crate provides functionality for:
//! - Registering, updating and deleting tracked SIM devices
//! - Requesting tracking fixes that land after a fixed delay
//! - Searching devices and the observation log
//! - On-demand status statistics
//! - Change notifications via a broadcast channel
//!
//! ## Tracking Workflow
//!
//! `start_tracking` flips the device to `tracking` immediately and
//! schedules one deferred fix. Tasks are keyed by device ID: a repeated
//! request cancels and replaces the pending one, and deleting the device
//! cancels it outright. When the fix lands the device gets a fresh
//! `last_location`, flips back to `active`, and one observation is
//! prepended to the log.
//!
//! ## Example
//!
//! ```rust,no_run
//! use simtrace_store::SimStore;
//! use simtrace_core::SeedData;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let seed = SeedData::demo();
//! let store = SimStore::new(seed.sims, seed.history, Duration::from_secs(2));
//!
//! let stats = store.stats();
//! println!("{} devices, {} tracking", stats.total, stats.tracking);
//! # }
//! ```

pub mod events;
pub mod store;
pub mod tracker;

pub use events::StoreEvent;
pub use store::{SimStats, SimStore};
pub use tracker::TRACKING_FIX_ADDRESS;
