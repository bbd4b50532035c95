//! Tracked SIM device types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a tracked device.
///
/// This is a display status, not a guarded protocol: any value may be set
/// directly via a partial update. The only automatic transition is
/// `Tracking -> Active` when a deferred tracking fix lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimStatus {
    /// Device is active and reporting.
    Active,
    /// Device is registered but idle.
    Inactive,
    /// A tracking fix has been requested and is pending.
    Tracking,
}

impl Default for SimStatus {
    fn default() -> Self {
        Self::Inactive
    }
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Tracking => write!(f, "tracking"),
        }
    }
}

impl FromStr for SimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "tracking" => Ok(Self::Tracking),
            other => Err(format!(
                "unknown status '{}', expected 'active', 'inactive' or 'tracking'",
                other
            )),
        }
    }
}

/// Last known position of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub timestamp: DateTime<Utc>,
}

/// A tracked SIM device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimCard {
    /// Unique device ID.
    pub id: Uuid,

    /// Phone number (no uniqueness constraint).
    pub phone_number: String,

    /// Display name.
    pub name: String,

    /// Free-text remarks.
    pub remarks: String,

    /// Current lifecycle status.
    pub status: SimStatus,

    /// Last known location, if any fix has ever landed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_location: Option<LastLocation>,

    /// Subscriber identity (IMSI), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imsi: Option<String>,

    /// Equipment identity (IMEI), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,

    /// When the device was registered.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl SimCard {
    /// Case-insensitive substring match against phone number, name or remarks.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.phone_number.to_lowercase().contains(needle_lower)
            || self.name.to_lowercase().contains(needle_lower)
            || self.remarks.to_lowercase().contains(needle_lower)
    }
}

/// Fields for registering a new device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSim {
    pub phone_number: String,
    pub name: String,
    #[serde(default)]
    pub remarks: String,
    pub status: SimStatus,
    #[serde(default)]
    pub last_location: Option<LastLocation>,
    #[serde(default)]
    pub imsi: Option<String>,
    #[serde(default)]
    pub imei: Option<String>,
}

/// Partial update for a device. Only the supplied fields are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimPatch {
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub remarks: Option<String>,
    pub status: Option<SimStatus>,
    pub last_location: Option<LastLocation>,
    pub imsi: Option<String>,
    pub imei: Option<String>,
}

impl SimPatch {
    /// Merge the supplied fields into `sim`. Does not touch `updated_at`;
    /// the store refreshes that on every mutation.
    pub fn apply(&self, sim: &mut SimCard) {
        if let Some(phone_number) = &self.phone_number {
            sim.phone_number = phone_number.clone();
        }
        if let Some(name) = &self.name {
            sim.name = name.clone();
        }
        if let Some(remarks) = &self.remarks {
            sim.remarks = remarks.clone();
        }
        if let Some(status) = self.status {
            sim.status = status;
        }
        if let Some(last_location) = &self.last_location {
            sim.last_location = Some(last_location.clone());
        }
        if let Some(imsi) = &self.imsi {
            sim.imsi = Some(imsi.clone());
        }
        if let Some(imei) = &self.imei {
            sim.imei = Some(imei.clone());
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none()
            && self.name.is_none()
            && self.remarks.is_none()
            && self.status.is_none()
            && self.last_location.is_none()
            && self.imsi.is_none()
            && self.imei.is_none()
    }
}
