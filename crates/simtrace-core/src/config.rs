//! Configuration and seed datasets.
//!
//! Configuration is loaded from a YAML file (`simtrace.yaml` by default).
//! The stores hold no ambient globals: the composition root loads a
//! [`SeedData`] dataset (from a file, or the built-in demo set) and injects
//! it into the stores at construction time.

use crate::account::{Account, Role};
use crate::location::LocationEntry;
use crate::sim::{LastLocation, SimCard, SimStatus};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading configuration or seed data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config or seed file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level Simtrace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimtraceConfig {
    /// Where the durable session record lives.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Delay before a requested tracking fix lands, in milliseconds.
    #[serde(default = "default_tracking_delay_ms")]
    pub tracking_delay_ms: u64,

    /// Optional seed dataset file. When absent the built-in demo dataset
    /// is used.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

fn default_session_file() -> PathBuf {
    PathBuf::from("session.yaml")
}

fn default_tracking_delay_ms() -> u64 {
    2000
}

impl Default for SimtraceConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
            tracking_delay_ms: default_tracking_delay_ms(),
            seed_file: None,
        }
    }
}

impl SimtraceConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the seed dataset: the configured file if set, otherwise the
    /// built-in demo dataset.
    pub fn seed_data(&self) -> Result<SeedData, ConfigError> {
        match &self.seed_file {
            Some(path) => SeedData::load(path),
            None => Ok(SeedData::demo()),
        }
    }
}

/// A roster entry as seeded: a public account plus its plaintext secret.
///
/// Plaintext secrets are a deliberate simplification carried over from the
/// system this models; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    #[serde(flatten)]
    pub account: Account,
    pub secret: String,
}

/// Initial dataset injected into the stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    #[serde(default)]
    pub sims: Vec<SimCard>,
    #[serde(default)]
    pub history: Vec<LocationEntry>,
}

impl SeedData {
    /// Load a seed dataset from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in demo dataset: three accounts, three devices and three
    /// observations, with timestamps relative to now.
    pub fn demo() -> Self {
        let now = Utc::now();

        let accounts = vec![
            SeedAccount {
                account: Account {
                    id: Uuid::new_v4(),
                    username: "admin".to_string(),
                    alias: "System Administrator".to_string(),
                    role: Role::Admin,
                    created_at: now - Duration::days(30),
                },
                secret: "admin123".to_string(),
            },
            SeedAccount {
                account: Account {
                    id: Uuid::new_v4(),
                    username: "user1".to_string(),
                    alias: "Field Agent Alpha".to_string(),
                    role: Role::User,
                    created_at: now - Duration::days(29),
                },
                secret: "user123".to_string(),
            },
            SeedAccount {
                account: Account {
                    id: Uuid::new_v4(),
                    username: "user2".to_string(),
                    alias: "Field Agent Beta".to_string(),
                    role: Role::User,
                    created_at: now - Duration::days(28),
                },
                secret: "user123".to_string(),
            },
        ];

        let primary_id = Uuid::new_v4();
        let backup_id = Uuid::new_v4();
        let test_id = Uuid::new_v4();

        let sims = vec![
            SimCard {
                id: primary_id,
                phone_number: "+1234567890".to_string(),
                name: "Primary Device".to_string(),
                remarks: "Main tracking device for operation Alpha".to_string(),
                status: SimStatus::Active,
                last_location: Some(LastLocation {
                    latitude: 40.7128,
                    longitude: -74.0060,
                    address: "New York, NY, USA".to_string(),
                    timestamp: now - Duration::hours(2),
                }),
                imsi: Some("310260123456789".to_string()),
                imei: Some("123456789012345".to_string()),
                created_at: now - Duration::days(14),
                updated_at: now - Duration::hours(2),
            },
            SimCard {
                id: backup_id,
                phone_number: "+1234567891".to_string(),
                name: "Backup Device".to_string(),
                remarks: "Secondary tracking device".to_string(),
                status: SimStatus::Tracking,
                last_location: Some(LastLocation {
                    latitude: 34.0522,
                    longitude: -118.2437,
                    address: "Los Angeles, CA, USA".to_string(),
                    timestamp: now - Duration::hours(3),
                }),
                imsi: Some("310260123456790".to_string()),
                imei: Some("123456789012346".to_string()),
                created_at: now - Duration::days(13),
                updated_at: now - Duration::hours(3),
            },
            SimCard {
                id: test_id,
                phone_number: "+1234567892".to_string(),
                name: "Test Device".to_string(),
                remarks: "Testing purposes only".to_string(),
                status: SimStatus::Inactive,
                last_location: None,
                imsi: Some("310260123456791".to_string()),
                imei: Some("123456789012347".to_string()),
                created_at: now - Duration::days(12),
                updated_at: now - Duration::days(12),
            },
        ];

        let history = vec![
            LocationEntry {
                id: Uuid::new_v4(),
                sim_id: primary_id,
                phone_number: "+1234567890".to_string(),
                imsi: "310260123456789".to_string(),
                imei: "123456789012345".to_string(),
                latitude: 40.7128,
                longitude: -74.0060,
                address: "New York, NY, USA".to_string(),
                timestamp: now - Duration::hours(2),
            },
            LocationEntry {
                id: Uuid::new_v4(),
                sim_id: primary_id,
                phone_number: "+1234567890".to_string(),
                imsi: "310260123456789".to_string(),
                imei: "123456789012345".to_string(),
                latitude: 40.7589,
                longitude: -73.9851,
                address: "Central Park, New York, NY, USA".to_string(),
                timestamp: now - Duration::hours(4),
            },
            LocationEntry {
                id: Uuid::new_v4(),
                sim_id: backup_id,
                phone_number: "+1234567891".to_string(),
                imsi: "310260123456790".to_string(),
                imei: "123456789012346".to_string(),
                latitude: 34.0522,
                longitude: -118.2437,
                address: "Los Angeles, CA, USA".to_string(),
                timestamp: now - Duration::hours(3),
            },
        ];

        Self {
            accounts,
            sims,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_dataset_is_consistent() {
        let seed = SeedData::demo();
        assert_eq!(seed.accounts.len(), 3);
        assert_eq!(seed.sims.len(), 3);
        assert_eq!(seed.history.len(), 3);

        // Every observation references a seeded device.
        for entry in &seed.history {
            assert!(seed.sims.iter().any(|sim| sim.id == entry.sim_id));
        }

        // Exactly one admin.
        let admins = seed
            .accounts
            .iter()
            .filter(|a| a.account.role == Role::Admin)
            .count();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = SimtraceConfig::default();
        assert_eq!(config.session_file, PathBuf::from("session.yaml"));
        assert_eq!(config.tracking_delay_ms, 2000);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_config_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tracking_delay_ms: 50").unwrap();

        let config = SimtraceConfig::load(file.path()).unwrap();
        assert_eq!(config.tracking_delay_ms, 50);
        assert_eq!(config.session_file, PathBuf::from("session.yaml"));
    }

    #[test]
    fn test_seed_round_trip() {
        let seed = SeedData::demo();
        let yaml = serde_yaml::to_string(&seed).unwrap();
        let back: SeedData = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.sims, seed.sims);
        assert_eq!(back.history, seed.history);
        assert_eq!(back.accounts.len(), seed.accounts.len());
    }
}
