//! Change notifications.
//!
//! Every mutation of the store emits one event on a broadcast channel.
//! Consumers subscribe and pull fresh query results on receipt; events
//! carry only the kind of change and the device ID, never data.

use uuid::Uuid;

/// A change to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A device was registered.
    SimAdded(Uuid),
    /// A device was mutated (partial update or tracking status flip).
    SimUpdated(Uuid),
    /// A device was deleted (its observations are gone too).
    SimDeleted(Uuid),
    /// A tracking fix landed and one observation was prepended.
    LocationRecorded(Uuid),
}

impl StoreEvent {
    /// The device this event concerns.
    pub fn sim_id(&self) -> Uuid {
        match self {
            Self::SimAdded(id)
            | Self::SimUpdated(id)
            | Self::SimDeleted(id)
            | Self::LocationRecorded(id) => *id,
        }
    }
}
