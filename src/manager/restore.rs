// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Restoring stored originals.

use super::adjustment::is_selected;
use super::{Outcome, ThermostatManager};
use crate::error::{Error, ValidationError};
use crate::gateway::DeviceGateway;
use crate::snapshot::SnapshotStore;

impl<G: DeviceGateway, S: SnapshotStore> ThermostatManager<G, S> {
    /// Sets the selected devices back to their stored originals.
    ///
    /// `device_ids` of `None` (or an empty slice) restores every stored
    /// device. Only devices whose command succeeded are removed from the
    /// snapshot; failed ones stay so the restore can be retried. When the
    /// last entry is removed the snapshot is deleted.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSnapshot` if nothing is stored,
    /// `Error::Validation` if none of the selected devices has a stored
    /// original, and `Error::Storage` if the snapshot cannot be read or
    /// updated.
    pub async fn restore(&self, device_ids: Option<&[String]>) -> Result<Outcome, Error> {
        let _guard = self.operation.lock().await;

        let Some(mut snapshot) = self.store.load()? else {
            tracing::info!("Restore requested without stored originals");
            return Err(Error::NoSnapshot);
        };

        let commands: Vec<(String, f64)> = snapshot
            .iter()
            .filter(|(id, _)| is_selected(device_ids, id))
            .map(|(id, original)| (id.to_string(), original))
            .collect();
        if commands.is_empty() {
            return Err(ValidationError::NoTargets.into());
        }

        let outcome = self.dispatch(commands).await;

        if outcome.changed() > 0 {
            for device_id in outcome.succeeded() {
                snapshot.remove(device_id);
            }
            self.persist(&snapshot)?;
        }

        tracing::info!(
            restored = outcome.changed(),
            errors = outcome.errors().len(),
            remaining = snapshot.len(),
            "Restore finished"
        );
        Ok(outcome)
    }
}
