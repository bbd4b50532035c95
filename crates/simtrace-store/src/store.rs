//! The device roster and observation log.

use crate::events::StoreEvent;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use simtrace_core::{LocationEntry, NewSim, SimCard, SimPatch, SimStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Capacity of the change-notification channel. A lagging subscriber
/// drops old events; it never blocks the store.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Device counts by status, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub tracking: usize,
}

pub(crate) struct State {
    pub(crate) sims: Vec<SimCard>,
    /// Insertion-ordered, newest first.
    pub(crate) history: Vec<LocationEntry>,
}

pub(crate) struct Inner {
    pub(crate) state: RwLock<State>,
    /// Pending tracking tasks, keyed by device ID.
    pub(crate) trackers: Mutex<HashMap<Uuid, JoinHandle<()>>>,
    pub(crate) events: broadcast::Sender<StoreEvent>,
    pub(crate) tracking_delay: Duration,
}

/// The device/location store.
///
/// Cheap to clone; all clones share the same state. Constructed by the
/// composition root from an injected seed dataset.
#[derive(Clone)]
pub struct SimStore {
    pub(crate) inner: Arc<Inner>,
}

impl SimStore {
    /// Build the store from seeded devices and observations.
    ///
    /// `tracking_delay` is how long a requested tracking fix takes to land.
    pub fn new(
        sims: Vec<SimCard>,
        history: Vec<LocationEntry>,
        tracking_delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(State { sims, history }),
                trackers: Mutex::new(HashMap::new()),
                events,
                tracking_delay,
            }),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn emit(&self, event: StoreEvent) {
        // No receivers is fine.
        let _ = self.inner.events.send(event);
    }

    /// All devices in roster order.
    pub fn sims(&self) -> Vec<SimCard> {
        self.inner.state.read().unwrap().sims.clone()
    }

    /// One device by ID.
    pub fn get_sim(&self, id: Uuid) -> Option<SimCard> {
        self.inner
            .state
            .read()
            .unwrap()
            .sims
            .iter()
            .find(|sim| sim.id == id)
            .cloned()
    }

    /// The full observation log, newest first.
    pub fn history(&self) -> Vec<LocationEntry> {
        self.inner.state.read().unwrap().history.clone()
    }

    /// Register a new device. No uniqueness constraint on the phone number.
    pub fn add_sim(&self, new: NewSim) -> SimCard {
        let now = Utc::now();
        let sim = SimCard {
            id: Uuid::new_v4(),
            phone_number: new.phone_number,
            name: new.name,
            remarks: new.remarks,
            status: new.status,
            last_location: new.last_location,
            imsi: new.imsi,
            imei: new.imei,
            created_at: now,
            updated_at: now,
        };

        self.inner.state.write().unwrap().sims.push(sim.clone());
        tracing::info!("registered device '{}' ({})", sim.name, sim.id);
        self.emit(StoreEvent::SimAdded(sim.id));
        sim
    }

    /// Merge a partial update into a device and refresh `updated_at`.
    /// Silent no-op when the ID is unknown.
    pub fn update_sim(&self, id: Uuid, patch: SimPatch) {
        let found = {
            let mut state = self.inner.state.write().unwrap();
            match state.sims.iter_mut().find(|sim| sim.id == id) {
                Some(sim) => {
                    patch.apply(sim);
                    sim.updated_at = Utc::now();
                    true
                }
                None => false,
            }
        };

        if found {
            self.emit(StoreEvent::SimUpdated(id));
        } else {
            tracing::debug!("update for unknown device {} ignored", id);
        }
    }

    /// Delete a device, cascading removal of its observations and
    /// cancelling any pending tracking task.
    pub fn delete_sim(&self, id: Uuid) {
        self.cancel_tracker(id);

        let found = {
            let mut state = self.inner.state.write().unwrap();
            let before = state.sims.len();
            state.sims.retain(|sim| sim.id != id);
            state.history.retain(|entry| entry.sim_id != id);
            state.sims.len() != before
        };

        if found {
            tracing::info!("deleted device {}", id);
            self.emit(StoreEvent::SimDeleted(id));
        }
    }

    /// Case-insensitive substring search over phone number, name and
    /// remarks. An empty query matches the whole roster.
    pub fn search_sims(&self, query: &str) -> Vec<SimCard> {
        let needle = query.to_lowercase();
        self.inner
            .state
            .read()
            .unwrap()
            .sims
            .iter()
            .filter(|sim| sim.matches(&needle))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over phone number, IMSI, IMEI
    /// and address.
    pub fn search_history(&self, query: &str) -> Vec<LocationEntry> {
        let needle = query.to_lowercase();
        self.inner
            .state
            .read()
            .unwrap()
            .history
            .iter()
            .filter(|entry| entry.matches(&needle))
            .cloned()
            .collect()
    }

    /// Observations for one device, newest first.
    pub fn history_for_sim(&self, id: Uuid) -> Vec<LocationEntry> {
        self.inner
            .state
            .read()
            .unwrap()
            .history
            .iter()
            .filter(|entry| entry.sim_id == id)
            .cloned()
            .collect()
    }

    /// Observations whose RFC 3339 timestamp starts with `prefix`
    /// (typically a `YYYY-MM-DD` date).
    pub fn history_on_date(&self, prefix: &str) -> Vec<LocationEntry> {
        self.inner
            .state
            .read()
            .unwrap()
            .history
            .iter()
            .filter(|entry| {
                entry
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
                    .starts_with(prefix)
            })
            .cloned()
            .collect()
    }

    /// The newest `n` observations.
    pub fn recent_history(&self, n: usize) -> Vec<LocationEntry> {
        self.inner
            .state
            .read()
            .unwrap()
            .history
            .iter()
            .take(n)
            .cloned()
            .collect()
    }

    /// Device counts by current status.
    pub fn stats(&self) -> SimStats {
        let state = self.inner.state.read().unwrap();
        let mut stats = SimStats {
            total: state.sims.len(),
            active: 0,
            inactive: 0,
            tracking: 0,
        };
        for sim in &state.sims {
            match sim.status {
                SimStatus::Active => stats.active += 1,
                SimStatus::Inactive => stats.inactive += 1,
                SimStatus::Tracking => stats.tracking += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtrace_core::SeedData;

    fn seeded_store() -> SimStore {
        let seed = SeedData::demo();
        SimStore::new(seed.sims, seed.history, Duration::from_millis(10))
    }

    fn new_sim(phone: &str, name: &str) -> NewSim {
        NewSim {
            phone_number: phone.to_string(),
            name: name.to_string(),
            remarks: String::new(),
            status: SimStatus::Inactive,
            last_location: None,
            imsi: None,
            imei: None,
        }
    }

    #[tokio::test]
    async fn test_add_sim_assigns_id_and_timestamps() {
        let store = seeded_store();
        let sim = store.add_sim(new_sim("+1999", "Fresh"));

        assert_eq!(sim.created_at, sim.updated_at);
        assert_eq!(store.sims().len(), 4);
        assert_eq!(store.get_sim(sim.id).unwrap().name, "Fresh");
    }

    #[tokio::test]
    async fn test_update_sim_refreshes_updated_at() {
        let store = seeded_store();
        let sim = store.add_sim(new_sim("+1999", "Fresh"));

        store.update_sim(
            sim.id,
            SimPatch {
                remarks: Some("field test".to_string()),
                ..Default::default()
            },
        );

        let updated = store.get_sim(sim.id).unwrap();
        assert_eq!(updated.remarks, "field test");
        assert!(updated.updated_at >= sim.updated_at);
        assert_eq!(updated.created_at, sim.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_sim_is_silent() {
        let store = seeded_store();
        let before = store.sims();
        store.update_sim(
            Uuid::new_v4(),
            SimPatch {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(store.sims(), before);
    }

    #[tokio::test]
    async fn test_delete_sim_cascades_history() {
        let store = seeded_store();
        let primary = store
            .sims()
            .into_iter()
            .find(|sim| sim.name == "Primary Device")
            .unwrap();
        assert_eq!(store.history_for_sim(primary.id).len(), 2);

        store.delete_sim(primary.id);

        assert_eq!(store.sims().len(), 2);
        assert!(store.history_for_sim(primary.id).is_empty());
        // Other devices' observations are untouched.
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn test_search_sims() {
        let store = seeded_store();

        assert_eq!(store.search_sims("PRIMARY").len(), 1);
        assert_eq!(store.search_sims("+123456789").len(), 3);
        assert_eq!(store.search_sims("operation alpha").len(), 1);
        assert!(store.search_sims("no such device").is_empty());

        // Empty query returns the full roster.
        assert_eq!(store.search_sims("").len(), 3);
    }

    #[tokio::test]
    async fn test_search_history() {
        let store = seeded_store();

        assert_eq!(store.search_history("central park").len(), 1);
        assert_eq!(store.search_history("310260123456790").len(), 1);
        assert_eq!(store.search_history("+1234567890").len(), 2);
        assert!(store.search_history("berlin").is_empty());
    }

    #[tokio::test]
    async fn test_history_on_date() {
        let mut seed = SeedData::demo();
        seed.history[0].timestamp = "2024-01-15T10:30:00Z".parse().unwrap();
        let store = SimStore::new(seed.sims, seed.history, Duration::from_millis(10));

        let on_date = store.history_on_date("2024-01-15");
        assert_eq!(on_date.len(), 1);
        assert!(store.history_on_date("1999-01-01").is_empty());
        // An empty prefix matches everything.
        assert_eq!(store.history_on_date("").len(), 3);
    }

    #[tokio::test]
    async fn test_recent_history() {
        let store = seeded_store();
        assert_eq!(store.recent_history(2).len(), 2);
        assert_eq!(store.recent_history(0).len(), 0);
        assert_eq!(store.recent_history(100).len(), 3);
        // Order preserved: newest first.
        assert_eq!(store.recent_history(1)[0], store.history()[0]);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = seeded_store();
        let stats = store.stats();
        assert_eq!(
            stats,
            SimStats {
                total: 3,
                active: 1,
                inactive: 1,
                tracking: 1
            }
        );
    }

    #[tokio::test]
    async fn test_events_emitted_on_mutation() {
        let store = seeded_store();
        let mut rx = store.subscribe();

        let sim = store.add_sim(new_sim("+1999", "Fresh"));
        store.update_sim(
            sim.id,
            SimPatch {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        );
        store.delete_sim(sim.id);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::SimAdded(sim.id));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::SimUpdated(sim.id));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::SimDeleted(sim.id));
    }
}
