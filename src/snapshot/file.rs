// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON file snapshot store.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Snapshot, SnapshotStore};
use crate::error::StorageError;

/// Stores the snapshot as a pretty-printed JSON object in a single file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash never leaves a truncated snapshot behind.
///
/// # Examples
///
/// ```no_run
/// use thermostat_manager::snapshot::{JsonFileSnapshotStore, SnapshotStore};
///
/// let store = JsonFileSnapshotStore::default();
/// assert_eq!(store.path().to_str(), Some("/data/original_temps.json"));
///
/// if let Some(snapshot) = store.load()? {
///     println!("{} originals stored", snapshot.len());
/// }
/// # Ok::<(), thermostat_manager::error::StorageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Default location inside the add-on's persistent data volume.
    pub const DEFAULT_PATH: &'static str = "/data/original_temps.json";

    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Writes `contents` to `path` and flushes it to disk.
    fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn io_error(path: &Path, source: io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Default for JsonFileSnapshotStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No snapshot file present");
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        if snapshot.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            path = %self.path.display(),
            count = snapshot.len(),
            "Loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();
        if let Err(e) = Self::write_synced(&temp, contents.as_bytes()) {
            let _ = fs::remove_file(&temp);
            return Err(Self::io_error(&temp, e));
        }
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(Self::io_error(&self.path, e));
        }

        tracing::debug!(
            path = %self.path.display(),
            count = snapshot.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Deleted snapshot");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }
}
