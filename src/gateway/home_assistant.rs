// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant REST API gateway.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::DeviceGateway;
use crate::config::HomeAssistantConfig;
use crate::error::{DeviceCommandError, GatewayError};
use crate::types::{Device, HvacMode, TemperatureRange};

/// Entity id prefix of climate devices.
const CLIMATE_PREFIX: &str = "climate.";

/// Gateway talking to the Home Assistant REST API.
///
/// Devices are read from `GET /states` (only `climate.*` entities are kept)
/// and commanded through `POST /services/climate/set_temperature`. Every
/// request carries the configured bearer token and timeout.
///
/// # Examples
///
/// ```no_run
/// use thermostat_manager::{DeviceGateway, HomeAssistantConfig, HomeAssistantGateway};
///
/// # async fn example() -> thermostat_manager::Result<()> {
/// let gateway = HomeAssistantGateway::new(HomeAssistantConfig::from_supervisor_env())?;
/// for device in gateway.list_devices().await? {
///     println!("{}: {:?}", device.id(), device.target_temperature());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HomeAssistantGateway {
    config: HomeAssistantConfig,
    client: Client,
}

/// Connectivity report for troubleshooting a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayDiagnostics {
    /// Whether a non-empty token is configured.
    pub token_present: bool,
    /// The API base URL in use.
    pub base_url: String,
    /// Number of entities of any kind the platform reports.
    pub total_entities: usize,
    /// Ids of the climate entities among them.
    pub climate_entity_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EntityState {
    entity_id: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    attributes: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ClimateAttributes {
    friendly_name: Option<String>,
    current_temperature: Option<f64>,
    temperature: Option<f64>,
    min_temp: Option<f64>,
    max_temp: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SetTemperatureRequest<'a> {
    entity_id: &'a str,
    temperature: f64,
}

impl EntityState {
    fn is_climate(&self) -> bool {
        self.entity_id.starts_with(CLIMATE_PREFIX)
    }

    fn into_device(self) -> Device {
        let attributes = match self.attributes.map(serde_json::from_value::<ClimateAttributes>) {
            None => ClimateAttributes::default(),
            Some(Ok(attributes)) => attributes,
            Some(Err(e)) => {
                tracing::warn!(
                    device_id = %self.entity_id,
                    error = %e,
                    "Ignoring malformed climate attributes"
                );
                ClimateAttributes::default()
            }
        };

        let mode = self
            .state
            .as_deref()
            .map_or_else(HvacMode::default, |s| s.parse().unwrap_or_default());

        let mut device = Device::new(self.entity_id)
            .with_range(TemperatureRange::from_bounds(
                attributes.min_temp,
                attributes.max_temp,
            ))
            .with_mode(mode);
        if let Some(name) = attributes.friendly_name {
            device = device.with_name(name);
        }
        if let Some(value) = attributes.current_temperature {
            device = device.with_current_temperature(value);
        }
        if let Some(value) = attributes.temperature {
            device = device.with_target_temperature(value);
        }
        device
    }
}

impl HomeAssistantGateway {
    /// Creates a gateway from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: HomeAssistantConfig) -> Result<Self, GatewayError> {
        if !config.has_token() {
            tracing::warn!("Home Assistant gateway created without an access token");
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { config, client })
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &HomeAssistantConfig {
        &self.config
    }

    /// Queries the platform and reports what it can see.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the state list cannot be fetched.
    pub async fn probe(&self) -> Result<GatewayDiagnostics, GatewayError> {
        let states = self.fetch_states().await?;
        let climate_entity_ids = states
            .iter()
            .filter(|s| s.is_climate())
            .map(|s| s.entity_id.clone())
            .collect();

        Ok(GatewayDiagnostics {
            token_present: self.config.has_token(),
            base_url: self.config.base_url().to_string(),
            total_entities: states.len(),
            climate_entity_ids,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url())
    }

    async fn fetch_states(&self) -> Result<Vec<EntityState>, GatewayError> {
        let url = self.url("states");
        tracing::debug!(url = %url, "Fetching entity states");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = check_status(response)?;

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| GatewayError::UnexpectedFormat(e.to_string()))
    }

    async fn post_set_temperature(
        &self,
        device_id: &str,
        temperature: f64,
    ) -> Result<(), GatewayError> {
        let url = self.url("services/climate/set_temperature");
        tracing::debug!(url = %url, device_id, temperature, "Sending set_temperature");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.token())
            .json(&SetTemperatureRequest {
                entity_id: device_id,
                temperature,
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        check_status(response)?;
        Ok(())
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            let millis = u64::try_from(self.config.timeout().as_millis()).unwrap_or(u64::MAX);
            GatewayError::Timeout(millis)
        } else {
            GatewayError::Http(e)
        }
    }
}

fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GatewayError::AuthenticationFailed);
    }
    if !status.is_success() {
        return Err(GatewayError::UnexpectedStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(response)
}

impl DeviceGateway for HomeAssistantGateway {
    async fn list_devices(&self) -> Result<Vec<Device>, GatewayError> {
        let devices: Vec<Device> = self
            .fetch_states()
            .await?
            .into_iter()
            .filter(EntityState::is_climate)
            .map(EntityState::into_device)
            .collect();

        tracing::debug!(count = devices.len(), "Fetched climate devices");
        Ok(devices)
    }

    async fn set_temperature(
        &self,
        device_id: &str,
        temperature: f64,
    ) -> Result<(), DeviceCommandError> {
        self.post_set_temperature(device_id, temperature)
            .await
            .map_err(|kind| {
                tracing::error!(device_id, error = %kind, "set_temperature failed");
                DeviceCommandError::new(device_id, kind)
            })
    }
}
