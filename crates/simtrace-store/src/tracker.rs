//! The tracking scheduler.
//!
//! Each `start_tracking` call schedules one deferred fix as a tokio task,
//! keyed by device ID. A repeated call for the same device cancels and
//! replaces the pending task; deleting the device cancels it. The fire
//! path re-checks that the device still exists, so a fix for a device
//! deleted in the meantime is suppressed rather than resurrected.

use crate::events::StoreEvent;
use crate::store::SimStore;
use chrono::Utc;
use rand::Rng;
use simtrace_core::{LastLocation, LocationEntry, SimStatus};
use uuid::Uuid;

/// Placeholder address attached to synthesized fixes.
pub const TRACKING_FIX_ADDRESS: &str = "Updated Location";

impl SimStore {
    /// Request a tracking fix for a device.
    ///
    /// Flips the device to `tracking` immediately and schedules one fix
    /// after the configured delay. Unknown IDs still schedule a task, but
    /// the fire-time existence check makes it a no-op.
    pub fn start_tracking(&self, id: Uuid) {
        let found = {
            let mut state = self.inner.state.write().unwrap();
            match state.sims.iter_mut().find(|sim| sim.id == id) {
                Some(sim) => {
                    sim.status = SimStatus::Tracking;
                    sim.updated_at = Utc::now();
                    true
                }
                None => false,
            }
        };
        if found {
            self.emit(StoreEvent::SimUpdated(id));
            tracing::info!("tracking requested for device {}", id);
        }

        let store = self.clone();
        let delay = self.inner.tracking_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.record_fix(id);
        });

        // Cancel-and-replace: at most one pending fix per device.
        let mut trackers = self.inner.trackers.lock().unwrap();
        if let Some(old) = trackers.insert(id, handle) {
            old.abort();
            tracing::debug!("replaced pending tracking task for device {}", id);
        }
    }

    /// Cancel any pending tracking task for a device.
    pub(crate) fn cancel_tracker(&self, id: Uuid) {
        let mut trackers = self.inner.trackers.lock().unwrap();
        if let Some(handle) = trackers.remove(&id) {
            handle.abort();
            tracing::debug!("cancelled pending tracking task for device {}", id);
        }
    }

    /// The deferred fix: synthesize one observation and attach it.
    fn record_fix(&self, id: Uuid) {
        let mut rng = rand::rng();
        let location = LastLocation {
            latitude: rng.random_range(-90.0..=90.0),
            longitude: rng.random_range(-180.0..=180.0),
            address: TRACKING_FIX_ADDRESS.to_string(),
            timestamp: Utc::now(),
        };

        {
            let mut state = self.inner.state.write().unwrap();
            let Some(sim) = state.sims.iter_mut().find(|sim| sim.id == id) else {
                // Deleted before the fix landed.
                tracing::debug!("suppressing tracking fix for deleted device {}", id);
                return;
            };

            sim.last_location = Some(location.clone());
            sim.status = SimStatus::Active;
            sim.updated_at = location.timestamp;

            // Denormalize identifiers as of fire time.
            let entry = LocationEntry {
                id: Uuid::new_v4(),
                sim_id: id,
                phone_number: sim.phone_number.clone(),
                imsi: sim.imsi.clone().unwrap_or_default(),
                imei: sim.imei.clone().unwrap_or_default(),
                latitude: location.latitude,
                longitude: location.longitude,
                address: location.address,
                timestamp: location.timestamp,
            };
            state.history.insert(0, entry);
        }

        tracing::info!("tracking fix landed for device {}", id);
        self.emit(StoreEvent::LocationRecorded(id));
    }
}
