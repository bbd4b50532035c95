//! Location observation log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observation in the location log.
///
/// Entries are immutable once created and carry denormalized copies of the
/// device's phone number and hardware identifiers as they were at
/// observation time, so the log stays meaningful after the device changes
/// or is deleted. The log itself is insertion-ordered, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Unique entry ID.
    pub id: Uuid,

    /// The device this observation belongs to.
    pub sim_id: Uuid,

    /// Phone number at observation time.
    pub phone_number: String,

    /// Subscriber identity at observation time (empty if unknown).
    #[serde(default)]
    pub imsi: String,

    /// Equipment identity at observation time (empty if unknown).
    #[serde(default)]
    pub imei: String,

    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub timestamp: DateTime<Utc>,
}

impl LocationEntry {
    /// Case-insensitive substring match against phone number, IMSI, IMEI
    /// or address.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.phone_number.to_lowercase().contains(needle_lower)
            || self.imsi.to_lowercase().contains(needle_lower)
            || self.imei.to_lowercase().contains(needle_lower)
            || self.address.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_matches() {
        let entry = LocationEntry {
            id: Uuid::new_v4(),
            sim_id: Uuid::new_v4(),
            phone_number: "+1234567890".to_string(),
            imsi: "310260123456789".to_string(),
            imei: String::new(),
            latitude: 40.7128,
            longitude: -74.0060,
            address: "New York, NY, USA".to_string(),
            timestamp: Utc::now(),
        };

        assert!(entry.matches("new york"));
        assert!(entry.matches("310260"));
        assert!(entry.matches("+1234"));
        assert!(!entry.matches("london"));
    }
}
