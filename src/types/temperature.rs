// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive range of target temperatures a device accepts, in °C.
///
/// Every value sent to a device passes through [`clamp`](Self::clamp).
///
/// # Examples
///
/// ```
/// use thermostat_manager::TemperatureRange;
///
/// let range = TemperatureRange::new(5.0, 30.0);
/// assert_eq!(range.clamp(35.0), 30.0);
/// assert_eq!(range.clamp(-4.0), 5.0);
/// assert_eq!(range.clamp(21.5), 21.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRange")]
pub struct TemperatureRange {
    min: f64,
    max: f64,
}

/// Wire form of [`TemperatureRange`], normalized through
/// [`TemperatureRange::new`] on decode.
#[derive(Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl From<RawRange> for TemperatureRange {
    fn from(raw: RawRange) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl TemperatureRange {
    /// Lower bound used when the platform does not report one.
    pub const DEFAULT_MIN: f64 = 5.0;

    /// Upper bound used when the platform does not report one.
    pub const DEFAULT_MAX: f64 = 30.0;

    /// Creates a range from two bounds.
    ///
    /// Bounds given in the wrong order are swapped. A NaN or infinite bound
    /// is replaced by the matching default.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_finite() { min } else { Self::DEFAULT_MIN };
        let max = if max.is_finite() { max } else { Self::DEFAULT_MAX };
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Creates a range from optional bounds, filling in the defaults.
    #[must_use]
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(
            min.unwrap_or(Self::DEFAULT_MIN),
            max.unwrap_or(Self::DEFAULT_MAX),
        )
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Constrains `value` to `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns `true` if `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

impl fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.min, self.max)
    }
}
