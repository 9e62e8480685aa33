// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for climate devices.
//!
//! # Types
//!
//! - [`Device`] - A climate device as reported by the platform
//! - [`TemperatureRange`] - Inclusive bounds for a device's target temperature
//! - [`HvacMode`] - The device's reported operating state

mod device;
mod hvac_mode;
mod temperature;

pub use device::Device;
pub use hvac_mode::HvacMode;
pub use temperature::TemperatureRange;
