// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Results reported by manager operations.

use std::fmt;

use serde::Serialize;

use crate::error::DeviceCommandError;
use crate::types::Device;

/// Aggregate result of sending commands to a batch of devices.
///
/// A batch with errors is still a completed operation: some devices may
/// have changed while others did not.
#[derive(Debug, Default)]
pub struct Outcome {
    succeeded: Vec<String>,
    errors: Vec<DeviceCommandError>,
}

impl Outcome {
    pub(crate) fn from_results(
        results: impl IntoIterator<Item = (String, Result<(), DeviceCommandError>)>,
    ) -> Self {
        let mut outcome = Self::default();
        for (device_id, result) in results {
            match result {
                Ok(()) => outcome.succeeded.push(device_id),
                Err(e) => outcome.errors.push(e),
            }
        }
        outcome.succeeded.sort_unstable();
        outcome
            .errors
            .sort_unstable_by(|a, b| a.device_id.cmp(&b.device_id));
        outcome
    }

    /// Returns the number of devices that accepted their command.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.succeeded.len()
    }

    /// Returns the ids of devices that accepted their command, sorted.
    #[must_use]
    pub fn succeeded(&self) -> &[String] {
        &self.succeeded
    }

    /// Returns the per-device failures, sorted by device id.
    #[must_use]
    pub fn errors(&self) -> &[DeviceCommandError] {
        &self.errors
    }

    /// Returns the per-device failures as display strings.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns `true` if every command succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "{} thermostats changed", self.changed())
        } else {
            write!(
                f,
                "{} thermostats changed, {} errors",
                self.changed(),
                self.errors.len()
            )
        }
    }
}

/// Whether an adjustment is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotStatus {
    /// A snapshot exists.
    pub active: bool,
    /// Number of stored originals; zero when inactive.
    pub count: usize,
}

/// A live device merged with its stored original, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermostatView {
    #[serde(flatten)]
    device: Device,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_temperature: Option<f64>,
}

impl ThermostatView {
    pub(crate) fn new(device: Device, original_temperature: Option<f64>) -> Self {
        Self {
            device,
            original_temperature,
        }
    }

    /// Returns the live device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the target temperature stored before the current adjustment.
    #[must_use]
    pub fn original_temperature(&self) -> Option<f64> {
        self.original_temperature
    }
}
