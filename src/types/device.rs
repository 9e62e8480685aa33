// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate device as reported by the platform.

use serde::{Deserialize, Serialize};

use super::{HvacMode, TemperatureRange};

/// A climate device fetched from the platform.
///
/// Devices are never persisted; they are fetched fresh for every operation.
///
/// # Examples
///
/// ```
/// use thermostat_manager::{Device, TemperatureRange};
///
/// let device = Device::new("climate.living_room")
///     .with_target_temperature(20.0)
///     .with_range(TemperatureRange::new(5.0, 30.0));
///
/// assert_eq!(device.id(), "climate.living_room");
/// assert_eq!(device.name(), "climate.living_room");
/// assert_eq!(device.target_temperature(), Some(20.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    id: String,
    name: String,
    current_temperature: Option<f64>,
    target_temperature: Option<f64>,
    range: TemperatureRange,
    mode: HvacMode,
}

impl Device {
    /// Creates a device with the given id, no readings and the default range.
    ///
    /// The display name defaults to the id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            current_temperature: None,
            target_temperature: None,
            range: TemperatureRange::default(),
            mode: HvacMode::default(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the measured room temperature.
    #[must_use]
    pub fn with_current_temperature(mut self, value: f64) -> Self {
        self.current_temperature = Some(value);
        self
    }

    /// Sets the target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, value: f64) -> Self {
        self.target_temperature = Some(value);
        self
    }

    /// Sets the allowed target range.
    #[must_use]
    pub fn with_range(mut self, range: TemperatureRange) -> Self {
        self.range = range;
        self
    }

    /// Sets the operating mode.
    #[must_use]
    pub fn with_mode(mut self, mode: HvacMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the stable device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the measured room temperature, if reported.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.current_temperature
    }

    /// Returns the target temperature, if reported as a finite number.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature.filter(|value| value.is_finite())
    }

    /// Returns the allowed target range.
    #[must_use]
    pub fn range(&self) -> TemperatureRange {
        self.range
    }

    /// Returns the reported operating mode.
    #[must_use]
    pub fn mode(&self) -> &HvacMode {
        &self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_defaults() {
        let device = Device::new("climate.office");
        assert_eq!(device.name(), "climate.office");
        assert_eq!(device.current_temperature(), None);
        assert_eq!(device.target_temperature(), None);
        assert_eq!(device.range(), TemperatureRange::default());
        assert_eq!(device.mode().as_str(), "unknown");
    }

    #[test]
    fn builder_chain() {
        let device = Device::new("climate.office")
            .with_name("Office")
            .with_current_temperature(19.5)
            .with_target_temperature(21.0)
            .with_range(TemperatureRange::new(7.0, 28.0))
            .with_mode(HvacMode::Heat);

        assert_eq!(device.name(), "Office");
        assert_eq!(device.current_temperature(), Some(19.5));
        assert_eq!(device.target_temperature(), Some(21.0));
        assert_eq!(device.range(), TemperatureRange::new(7.0, 28.0));
        assert_eq!(device.mode(), &HvacMode::Heat);
    }
}
