// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the platform that owns the climate devices.
//!
//! The [`DeviceGateway`] trait is the seam between the manager and the
//! outside world. [`HomeAssistantGateway`] implements it against the Home
//! Assistant REST API; tests substitute their own implementations.

#[cfg(feature = "http")]
mod home_assistant;

#[cfg(feature = "http")]
pub use home_assistant::{GatewayDiagnostics, HomeAssistantGateway};

use std::future::Future;
use std::sync::Arc;

use crate::error::{DeviceCommandError, GatewayError};
use crate::types::Device;

/// Trait for platforms that can list climate devices and set their target
/// temperature.
pub trait DeviceGateway: Send + Sync {
    /// Fetches all climate devices with their current state.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the platform cannot be reached or answers
    /// with something that is not a device list.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, GatewayError>> + Send;

    /// Sets the target temperature of a single device.
    ///
    /// # Arguments
    ///
    /// * `device_id` - The device to command
    /// * `temperature` - The new target temperature in °C, already clamped
    ///
    /// # Errors
    ///
    /// Returns `DeviceCommandError` naming the device on any transport,
    /// authorization or protocol failure.
    fn set_temperature(
        &self,
        device_id: &str,
        temperature: f64,
    ) -> impl Future<Output = Result<(), DeviceCommandError>> + Send;
}

impl<T: DeviceGateway> DeviceGateway for Arc<T> {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, GatewayError>> + Send {
        (**self).list_devices()
    }

    fn set_temperature(
        &self,
        device_id: &str,
        temperature: f64,
    ) -> impl Future<Output = Result<(), DeviceCommandError>> + Send {
        (**self).set_temperature(device_id, temperature)
    }
}
