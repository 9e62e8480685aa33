// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test fixtures.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use thermostat_manager::{
    Device, DeviceCommandError, DeviceGateway, GatewayError, TemperatureRange,
};

/// In-process stand-in for the device platform.
///
/// Successful commands update the stored device, so later listings see the
/// new target like a real platform would.
#[derive(Debug, Default)]
pub struct FakeGateway {
    devices: Mutex<BTreeMap<String, Device>>,
    failing: Mutex<HashSet<String>>,
    hanging: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, f64)>>,
    listing_broken: Mutex<bool>,
    command_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight counter when a command finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeGateway {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        let gateway = Self::default();
        {
            let mut map = gateway.devices.lock();
            for device in devices {
                map.insert(device.id().to_string(), device);
            }
        }
        gateway
    }

    /// Two devices `A` (target 20) and `B` (target 18), both in 5-30.
    pub fn two_devices() -> Self {
        Self::new([thermostat("A", 20.0), thermostat("B", 18.0)])
    }

    pub fn fail_device(&self, device_id: &str) {
        self.failing.lock().insert(device_id.to_string());
    }

    pub fn heal_device(&self, device_id: &str) {
        self.failing.lock().remove(device_id);
    }

    pub fn hang_device(&self, device_id: &str) {
        self.hanging.lock().insert(device_id.to_string());
    }

    pub fn break_listing(&self) {
        *self.listing_broken.lock() = true;
    }

    pub fn delay_commands(&self, delay: Duration) {
        *self.command_delay.lock() = Some(delay);
    }

    pub fn target(&self, device_id: &str) -> Option<f64> {
        self.devices
            .lock()
            .get(device_id)
            .and_then(Device::target_temperature)
    }

    /// Commands received so far, in arrival order.
    pub fn calls(&self) -> Vec<(String, f64)> {
        self.calls.lock().clone()
    }

    /// Commands received so far, sorted by device id.
    pub fn sorted_calls(&self) -> Vec<(String, f64)> {
        let mut calls = self.calls();
        calls.sort_by(|a, b| a.0.cmp(&b.0));
        calls
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Highest number of commands that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl DeviceGateway for FakeGateway {
    async fn list_devices(&self) -> Result<Vec<Device>, GatewayError> {
        if *self.listing_broken.lock() {
            return Err(GatewayError::UnexpectedStatus {
                status: 502,
                reason: "Bad Gateway".to_string(),
            });
        }
        Ok(self.devices.lock().values().cloned().collect())
    }

    async fn set_temperature(
        &self,
        device_id: &str,
        temperature: f64,
    ) -> Result<(), DeviceCommandError> {
        self.calls.lock().push((device_id.to_string(), temperature));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let delay = *self.command_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let hangs = self.hanging.lock().contains(device_id);
        if hangs {
            std::future::pending::<()>().await;
        }

        if self.failing.lock().contains(device_id) {
            return Err(DeviceCommandError::new(
                device_id,
                GatewayError::UnexpectedStatus {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                },
            ));
        }

        let mut devices = self.devices.lock();
        if let Some(device) = devices.remove(device_id) {
            devices.insert(
                device_id.to_string(),
                device.with_target_temperature(temperature),
            );
        }
        Ok(())
    }
}

/// A device with a known target in the default 5-30 range.
pub fn thermostat(id: &str, target: f64) -> Device {
    Device::new(id)
        .with_target_temperature(target)
        .with_range(TemperatureRange::new(5.0, 30.0))
}

pub fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

pub fn assert_temp(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("temperature should be known");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
