// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat Manager - temporary, reversible bulk adjustments of target
//! temperatures across Home Assistant climate devices.
//!
//! The first time an adjustment touches a device, its current target
//! temperature is stored as the original. Further adjustments build on the
//! device's current state without overwriting that original, and a restore
//! sends the originals back and forgets them.
//!
//! # Supported Operations
//!
//! - **List thermostats**: live device data merged with stored originals
//! - **Offset**: add a delta to each selected device's current target
//! - **Absolute**: set each selected device to the same target
//! - **Restore**: revert selected devices to their stored originals
//! - **Status**: whether originals are stored, and how many
//!
//! Every value sent to a device is clamped to that device's allowed range.
//!
//! # Quick Start
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
//!     manager.apply_absolute(17.0, None).await?;
//!     assert!(manager.status()?.active);
//!
//!     manager.restore(None).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Selecting Devices
//!
//! ```no_run
//! use thermostat_manager::snapshot::InMemorySnapshotStore;
//! use thermostat_manager::{HomeAssistantConfig, HomeAssistantGateway, ThermostatManager};
//!
//! # async fn example() -> thermostat_manager::Result<()> {
//! let gateway = HomeAssistantGateway::new(HomeAssistantConfig::new("token"))?;
//! let manager = ThermostatManager::new(gateway, InMemorySnapshotStore::new());
//!
//! let bedrooms = vec!["climate.bedroom".to_string(), "climate.guest".to_string()];
//! let outcome = manager.apply_offset(1.5, Some(bedrooms.as_slice())).await?;
//! println!("{outcome}");
//!
//! // Restore only the guest room; the bedroom keeps its stored original
//! manager.restore(Some(&bedrooms[1..])).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod snapshot;
pub mod types;

pub use config::{HomeAssistantConfig, ManagerConfig};
pub use error::{
    DeviceCommandError, Error, GatewayError, Result, StorageError, ValidationError,
};
pub use gateway::DeviceGateway;
#[cfg(feature = "http")]
pub use gateway::{GatewayDiagnostics, HomeAssistantGateway};
pub use manager::{
    Adjustment, AdjustmentRequest, Outcome, SnapshotStatus, ThermostatManager, ThermostatView,
};
pub use snapshot::{InMemorySnapshotStore, JsonFileSnapshotStore, Snapshot, SnapshotStore};
pub use types::{Device, HvacMode, TemperatureRange};
