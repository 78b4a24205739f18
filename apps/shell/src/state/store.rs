//! # Store State
//!
//! Wraps the local snapshot `Store` for use in commands.
//!
//! ## Thread Safety
//! `Store` holds a `SqlitePool`, which is thread-safe. Commands share it
//! without extra locking; each snapshot key has a single writer (the state
//! type that owns it).

use rueda_store::{SnapshotKey, SnapshotRepository, Store, StoreResult};
use serde::{Deserialize, Serialize};

/// Backend connection settings persisted under `db_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    pub fn inner(&self) -> &Store {
        &self.store
    }

    pub fn snapshots(&self) -> SnapshotRepository {
        self.store.snapshots()
    }

    /// The API URL saved by `set_api_url`, if any.
    pub async fn connection_settings(&self) -> StoreResult<Option<ConnectionSettings>> {
        self.snapshots().get_json(SnapshotKey::DbConfig).await
    }

    pub async fn save_connection_settings(&self, settings: &ConnectionSettings) -> StoreResult<()> {
        self.snapshots().put_json(SnapshotKey::DbConfig, settings).await
    }
}
