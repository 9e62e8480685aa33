// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjustment requests and target computation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::snapshot::Snapshot;
use crate::types::Device;

/// A change to apply to the target temperature of several devices.
///
/// # Examples
///
/// ```
/// use thermostat_manager::{Adjustment, Device, TemperatureRange};
///
/// let device = Device::new("climate.a")
///     .with_target_temperature(28.0)
///     .with_range(TemperatureRange::new(5.0, 30.0));
///
/// assert_eq!(Adjustment::Offset(5.0).target_for(&device), Some(30.0));
/// assert_eq!(Adjustment::Absolute(12.0).target_for(&device), Some(12.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Add a delta in °C to each device's current target.
    Offset(f64),
    /// Set every device to the same target in °C.
    #[serde(rename = "temperature")]
    Absolute(f64),
}

impl Adjustment {
    /// Checks that the adjustment would change something.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroOffset` for an offset of zero and
    /// `ValidationError::NonFiniteTemperature` for NaN or infinite values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let value = match *self {
            Self::Offset(value) | Self::Absolute(value) => value,
        };
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteTemperature(value));
        }
        if matches!(self, Self::Offset(offset) if *offset == 0.0) {
            return Err(ValidationError::ZeroOffset);
        }
        Ok(())
    }

    /// Computes the clamped value to send to `device`.
    ///
    /// Returns `None` for an offset on a device whose current target is
    /// unknown, and for any result that is not a finite number; such devices
    /// are skipped.
    #[must_use]
    pub fn target_for(&self, device: &Device) -> Option<f64> {
        let raw = match *self {
            Self::Offset(offset) => device.target_temperature()? + offset,
            Self::Absolute(temperature) => temperature,
        };
        raw.is_finite().then(|| device.range().clamp(raw))
    }
}

/// An [`Adjustment`] together with the devices it applies to.
///
/// Deserializes from `{"offset": 2.0}` or `{"temperature": 21.0}`, with an
/// optional `device_ids` (or `entity_ids`) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    #[serde(flatten)]
    adjustment: Adjustment,
    #[serde(default, alias = "entity_ids", skip_serializing_if = "Option::is_none")]
    device_ids: Option<Vec<String>>,
}

impl AdjustmentRequest {
    /// Creates a request targeting every device.
    #[must_use]
    pub fn new(adjustment: Adjustment) -> Self {
        Self {
            adjustment,
            device_ids: None,
        }
    }

    /// Creates a request that adds `offset` to every device's target.
    #[must_use]
    pub fn offset(offset: f64) -> Self {
        Self::new(Adjustment::Offset(offset))
    }

    /// Creates a request that sets every device to `temperature`.
    #[must_use]
    pub fn absolute(temperature: f64) -> Self {
        Self::new(Adjustment::Absolute(temperature))
    }

    /// Restricts the request to the given device ids.
    #[must_use]
    pub fn for_devices<I, S>(mut self, device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.device_ids = Some(device_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the adjustment.
    #[must_use]
    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    /// Returns the explicit device selection, if any.
    #[must_use]
    pub fn device_ids(&self) -> Option<&[String]> {
        self.device_ids.as_deref()
    }
}

/// Returns `true` if `device_id` is part of `selection`.
///
/// No selection and an empty selection both mean every device.
pub(crate) fn is_selected(selection: Option<&[String]>, device_id: &str) -> bool {
    match selection {
        Some(ids) if !ids.is_empty() => ids.iter().any(|id| id == device_id),
        _ => true,
    }
}

/// Records the current target of every device not yet in `snapshot`.
///
/// Returns how many entries were added.
pub(crate) fn record_originals(snapshot: &mut Snapshot, devices: &[Device]) -> usize {
    let mut added = 0;
    for device in devices {
        if let Some(current) = device.target_temperature()
            && snapshot.record_if_absent(device.id(), current)
        {
            added += 1;
        }
    }
    added
}

/// Computes the `(device_id, value)` commands for an adjustment.
pub(crate) fn plan(adjustment: Adjustment, devices: &[Device]) -> Vec<(String, f64)> {
    devices
        .iter()
        .filter_map(|device| {
            let Some(value) = adjustment.target_for(device) else {
                tracing::debug!(
                    device_id = device.id(),
                    "Skipping device without a target temperature"
                );
                return None;
            };
            Some((device.id().to_string(), value))
        })
        .collect()
}
