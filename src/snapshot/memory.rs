// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory snapshot store.

use parking_lot::Mutex;

use super::{Snapshot, SnapshotStore};
use crate::error::StorageError;

/// Keeps the snapshot in process memory.
///
/// Nothing survives a restart, so this store is meant for tests and for
/// embedding the manager where durability is handled elsewhere.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    ///
    /// An empty snapshot is treated as no snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let snapshot = (!snapshot.is_empty()).then_some(snapshot);
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Returns a copy of the stored snapshot without going through the
    /// [`SnapshotStore`] interface.
    #[must_use]
    pub fn peek(&self) -> Option<Snapshot> {
        self.snapshot.lock().clone()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        *self.snapshot.lock() = (!snapshot.is_empty()).then(|| snapshot.clone());
        Ok(())
    }

    fn delete(&self) -> Result<(), StorageError> {
        *self.snapshot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        [("climate.a".to_string(), 20.0)].into_iter().collect()
    }

    #[test]
    fn empty_store_loads_none() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let store = InMemorySnapshotStore::new();
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemorySnapshotStore::with_snapshot(sample());
        store.delete().unwrap();
        store.delete().unwrap();
        assert!(store.peek().is_none());
    }

    #[test]
    fn empty_snapshot_is_not_stored() {
        let store = InMemorySnapshotStore::with_snapshot(Snapshot::new());
        assert!(store.peek().is_none());

        store.save(&Snapshot::new()).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
