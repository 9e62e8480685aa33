// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence of original target temperatures.
//!
//! A [`Snapshot`] maps device ids to the target temperature each device had
//! before the current adjustment campaign started. At most one snapshot
//! exists per deployment, and it exists only while it holds at least one
//! entry.
//!
//! # Stores
//!
//! - [`JsonFileSnapshotStore`]: a single JSON file, the production store
//! - [`InMemorySnapshotStore`]: process-local, for tests and embedding

mod file;
mod memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use file::JsonFileSnapshotStore;
pub use memory::InMemorySnapshotStore;

use crate::error::StorageError;

/// Original target temperatures, keyed by device id.
///
/// Serialized as a flat JSON object, e.g. `{"climate.kitchen": 20.0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    originals: BTreeMap<String, f64>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` as the original for `device_id` unless one is already
    /// stored.
    ///
    /// Returns `true` if a new entry was added. An existing original is never
    /// overwritten; it is only dropped by [`remove`](Self::remove) after a
    /// successful restore.
    ///
    /// # Examples
    ///
    /// ```
    /// use thermostat_manager::snapshot::Snapshot;
    ///
    /// let mut snapshot = Snapshot::new();
    /// assert!(snapshot.record_if_absent("climate.a", 20.0));
    /// assert!(!snapshot.record_if_absent("climate.a", 25.0));
    /// assert_eq!(snapshot.get("climate.a"), Some(20.0));
    /// ```
    pub fn record_if_absent(&mut self, device_id: &str, value: f64) -> bool {
        if self.originals.contains_key(device_id) {
            return false;
        }
        self.originals.insert(device_id.to_string(), value);
        true
    }

    /// Removes the entry for `device_id`, returning the stored original.
    pub fn remove(&mut self, device_id: &str) -> Option<f64> {
        self.originals.remove(device_id)
    }

    /// Returns the stored original for `device_id`.
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<f64> {
        self.originals.get(device_id).copied()
    }

    /// Returns `true` if an original is stored for `device_id`.
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.originals.contains_key(device_id)
    }

    /// Returns the number of stored originals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns `true` if no originals are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Iterates over `(device_id, original)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.originals.iter().map(|(id, value)| (id.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            originals: iter.into_iter().collect(),
        }
    }
}

/// Durable storage for the single outstanding [`Snapshot`].
///
/// Implementations must treat a missing record as a valid state, not an
/// error. Any I/O failure is reported as a [`StorageError`] and aborts the
/// enclosing operation.
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted snapshot, or `None` if none exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record exists but cannot be read or
    /// decoded.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    /// Persists `snapshot`, replacing any prior content.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    /// Removes the persisted record. Does nothing if it is already absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing record cannot be removed.
    fn delete(&self) -> Result<(), StorageError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }

    fn delete(&self) -> Result<(), StorageError> {
        (**self).delete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_if_absent_keeps_first_value() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.record_if_absent("climate.a", 20.0));
        assert!(!snapshot.record_if_absent("climate.a", 25.0));
        assert_eq!(snapshot.get("climate.a"), Some(20.0));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn remove_returns_original() {
        let mut snapshot: Snapshot = [("climate.a".to_string(), 20.0)].into_iter().collect();
        assert_eq!(snapshot.remove("climate.a"), Some(20.0));
        assert_eq!(snapshot.remove("climate.a"), None);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn record_again_after_remove() {
        let mut snapshot = Snapshot::new();
        snapshot.record_if_absent("climate.a", 20.0);
        snapshot.remove("climate.a");
        assert!(snapshot.record_if_absent("climate.a", 22.0));
        assert_eq!(snapshot.get("climate.a"), Some(22.0));
    }

    #[test]
    fn serializes_as_flat_object() {
        let snapshot: Snapshot = [
            ("climate.b".to_string(), 18.0),
            ("climate.a".to_string(), 20.5),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"climate.a":20.5,"climate.b":18.0}"#);
    }

    #[test]
    fn deserializes_integer_temperatures() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"climate.a": 20}"#).unwrap();
        assert_eq!(snapshot.get("climate.a"), Some(20.0));
    }

    #[test]
    fn iter_is_ordered_by_id() {
        let snapshot: Snapshot = [
            ("climate.z".to_string(), 1.0),
            ("climate.a".to_string(), 2.0),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = snapshot.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["climate.a", "climate.z"]);
    }
}
