// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC operating mode.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Operating state reported by a climate device.
///
/// Parsing never fails: states the library does not know about, including
/// `unknown` and `unavailable`, are kept verbatim in [`HvacMode::Other`].
///
/// # Examples
///
/// ```
/// use thermostat_manager::HvacMode;
///
/// let mode: HvacMode = "heat".parse().unwrap();
/// assert_eq!(mode, HvacMode::Heat);
/// assert_eq!(mode.as_str(), "heat");
///
/// let mode: HvacMode = "unavailable".parse().unwrap();
/// assert_eq!(mode, HvacMode::Other("unavailable".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Device is switched off.
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Heating or cooling to stay within a band.
    HeatCool,
    /// Device decides on its own schedule.
    Auto,
    /// Dehumidifying.
    Dry,
    /// Fan only.
    FanOnly,
    /// Any other reported state.
    Other(String),
}

impl HvacMode {
    /// Returns the platform's string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::HeatCool => "heat_cool",
            Self::Auto => "auto",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
            Self::Other(s) => s,
        }
    }
}

impl Default for HvacMode {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "heat" => Self::Heat,
            "cool" => Self::Cool,
            "heat_cool" => Self::HeatCool,
            "auto" => Self::Auto,
            "dry" => Self::Dry,
            "fan_only" => Self::FanOnly,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl Serialize for HvacMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HvacMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!("off".parse::<HvacMode>().unwrap(), HvacMode::Off);
        assert_eq!("HEAT".parse::<HvacMode>().unwrap(), HvacMode::Heat);
        assert_eq!("heat_cool".parse::<HvacMode>().unwrap(), HvacMode::HeatCool);
        assert_eq!("fan_only".parse::<HvacMode>().unwrap(), HvacMode::FanOnly);
    }

    #[test]
    fn unknown_mode_is_preserved() {
        let mode: HvacMode = "unavailable".parse().unwrap();
        assert_eq!(mode.as_str(), "unavailable");
    }

    #[test]
    fn serde_uses_platform_strings() {
        let json = serde_json::to_string(&HvacMode::HeatCool).unwrap();
        assert_eq!(json, "\"heat_cool\"");

        let mode: HvacMode = serde_json::from_str("\"cool\"").unwrap();
        assert_eq!(mode, HvacMode::Cool);
    }
}
