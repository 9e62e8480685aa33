// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reversible bulk adjustments of target temperatures.
//!
//! The [`ThermostatManager`] ties a [`DeviceGateway`] to a [`SnapshotStore`].
//! The first adjustment touching a device records that device's target
//! temperature; later adjustments layer on top without touching the
//! recorded original, and a restore puts the original back.
//!
//! # Examples
//!
//! ```no_run
//! use thermostat_manager::snapshot::JsonFileSnapshotStore;
//! use thermostat_manager::{HomeAssistantConfig, HomeAssistantGateway, ThermostatManager};
//!
//! #[tokio::main]
//! async fn main() -> thermostat_manager::Result<()> {
//!     let gateway = HomeAssistantGateway::new(HomeAssistantConfig::from_supervisor_env())?;
//!     let manager = ThermostatManager::new(gateway, JsonFileSnapshotStore::default());
//!
//!     // Lower every thermostat by 2 °C
//!     let outcome = manager.apply_offset(-2.0, None).await?;
//!     println!("{outcome}");
//!
//!     // ...and later put them all back
//!     let outcome = manager.restore(None).await?;
//!     for message in outcome.error_messages() {
//!         eprintln!("{message}");
//!     }
//!
//!     Ok(())
//! }
//! ```

mod adjustment;
mod outcome;
mod restore;

pub use adjustment::{Adjustment, AdjustmentRequest};
pub use outcome::{Outcome, SnapshotStatus, ThermostatView};

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use crate::config::ManagerConfig;
use crate::error::{DeviceCommandError, Error, GatewayError, ValidationError};
use crate::gateway::DeviceGateway;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::types::Device;

use adjustment::{is_selected, plan, record_originals};

/// Applies and reverts bulk temperature adjustments.
///
/// The manager holds no state between calls besides what the store
/// persists. Adjustments and restores are serialized by an internal lock,
/// so two concurrent requests can never both decide to establish a
/// baseline or race on removing restored entries.
#[derive(Debug)]
pub struct ThermostatManager<G, S> {
    gateway: G,
    store: S,
    config: ManagerConfig,
    operation: Mutex<()>,
}

impl<G: DeviceGateway, S: SnapshotStore> ThermostatManager<G, S> {
    /// Creates a manager with the default configuration.
    #[must_use]
    pub fn new(gateway: G, store: S) -> Self {
        Self::with_config(gateway, store, ManagerConfig::default())
    }

    /// Creates a manager with a custom configuration.
    #[must_use]
    pub fn with_config(gateway: G, store: S, config: ManagerConfig) -> Self {
        Self {
            gateway,
            store,
            config,
            operation: Mutex::new(()),
        }
    }

    /// Returns the device gateway.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the snapshot store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists every device, merged with its stored original temperature.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gateway` if the platform cannot be queried, and
    /// `Error::Storage` if the snapshot cannot be read.
    pub async fn thermostats(&self) -> Result<Vec<ThermostatView>, Error> {
        let devices = self.gateway.list_devices().await.map_err(|e| {
            tracing::warn!(error = %e, "Could not list devices");
            e
        })?;
        let snapshot = self.store.load()?.unwrap_or_default();

        Ok(devices
            .into_iter()
            .map(|device| {
                let original = snapshot.get(device.id());
                ThermostatView::new(device, original)
            })
            .collect())
    }

    /// Reports whether an adjustment is outstanding.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the snapshot cannot be read.
    pub fn status(&self) -> Result<SnapshotStatus, Error> {
        Ok(self
            .store
            .load()?
            .map_or_else(SnapshotStatus::default, |snapshot| SnapshotStatus {
                active: true,
                count: snapshot.len(),
            }))
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    /// Adds `offset` °C to the target of each selected device.
    ///
    /// `device_ids` of `None` (or an empty slice) selects every device.
    /// Devices without a known target are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a zero offset or when no known device
    /// is selected, and `Error::Storage` if the baseline cannot be saved. In
    /// both cases no device is touched.
    pub async fn apply_offset(
        &self,
        offset: f64,
        device_ids: Option<&[String]>,
    ) -> Result<Outcome, Error> {
        self.adjust(Adjustment::Offset(offset), device_ids).await
    }

    /// Sets each selected device to `temperature` °C, clamped to its range.
    ///
    /// # Errors
    ///
    /// Same as [`apply_offset`](Self::apply_offset).
    pub async fn apply_absolute(
        &self,
        temperature: f64,
        device_ids: Option<&[String]>,
    ) -> Result<Outcome, Error> {
        self.adjust(Adjustment::Absolute(temperature), device_ids)
            .await
    }

    /// Applies a decoded [`AdjustmentRequest`].
    ///
    /// # Errors
    ///
    /// Same as [`apply_offset`](Self::apply_offset).
    pub async fn apply(&self, request: &AdjustmentRequest) -> Result<Outcome, Error> {
        self.adjust(request.adjustment(), request.device_ids())
            .await
    }

    async fn adjust(
        &self,
        adjustment: Adjustment,
        device_ids: Option<&[String]>,
    ) -> Result<Outcome, Error> {
        adjustment.validate()?;

        let _guard = self.operation.lock().await;

        let targets: Vec<Device> = self
            .devices()
            .await
            .into_iter()
            .filter(|device| is_selected(device_ids, device.id()))
            .collect();
        if targets.is_empty() {
            return Err(ValidationError::NoTargets.into());
        }

        let mut snapshot = self.store.load()?.unwrap_or_default();
        let recorded = record_originals(&mut snapshot, &targets);
        if recorded > 0 {
            self.store.save(&snapshot)?;
            tracing::info!(
                recorded,
                total = snapshot.len(),
                "Recorded original temperatures"
            );
        }

        let outcome = self.dispatch(plan(adjustment, &targets)).await;
        tracing::info!(
            ?adjustment,
            changed = outcome.changed(),
            errors = outcome.errors().len(),
            "Adjustment applied"
        );
        Ok(outcome)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Lists devices for an adjustment; an unreachable platform selects
    /// nothing.
    async fn devices(&self) -> Vec<Device> {
        match self.gateway.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::warn!(error = %e, "Could not list devices");
                Vec::new()
            }
        }
    }

    /// Sends every command, at most `max_concurrent_commands` at a time.
    async fn dispatch(&self, commands: Vec<(String, f64)>) -> Outcome {
        let results: Vec<_> = stream::iter(commands)
            .map(|(device_id, value)| async move {
                let result = self.send(&device_id, value).await;
                (device_id, result)
            })
            .buffer_unordered(self.config.max_concurrent_commands())
            .collect()
            .await;

        Outcome::from_results(results)
    }

    async fn send(&self, device_id: &str, value: f64) -> Result<(), DeviceCommandError> {
        let timeout = self.config.command_timeout();
        let result = tokio::time::timeout(timeout, self.gateway.set_temperature(device_id, value))
            .await
            .unwrap_or_else(|_| {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                Err(DeviceCommandError::new(
                    device_id,
                    GatewayError::Timeout(millis),
                ))
            });

        match &result {
            Ok(()) => tracing::debug!(device_id, value, "Target temperature set"),
            Err(e) => tracing::warn!(error = %e, "Target temperature not set"),
        }
        result
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), Error> {
        if snapshot.is_empty() {
            self.store.delete()?;
        } else {
            self.store.save(snapshot)?;
        }
        Ok(())
    }
}
