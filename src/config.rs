// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the platform connection and the manager.

use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variables checked for the Supervisor token, in order.
pub const TOKEN_ENV_VARS: &[&str] = &["SUPERVISOR_TOKEN", "HASSIO_TOKEN"];

/// Files checked for the Supervisor token when no variable is set, in order.
pub const TOKEN_FILES: &[&str] = &[
    "/run/s6/container_environment/SUPERVISOR_TOKEN",
    "/run/s6/container_environment/HASSIO_TOKEN",
    "/config/token",
    "/data/token",
];

/// Connection parameters for a Home Assistant instance.
///
/// # Examples
///
/// ```
/// use thermostat_manager::HomeAssistantConfig;
/// use std::time::Duration;
///
/// // Inside an add-on container, talking to the Supervisor proxy
/// let config = HomeAssistantConfig::new("token");
/// assert_eq!(config.base_url(), "http://supervisor/core/api");
///
/// // Direct connection with a long-lived access token
/// let config = HomeAssistantConfig::new("token")
///     .with_base_url("http://homeassistant.local:8123/api/")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://homeassistant.local:8123/api");
/// ```
#[derive(Clone)]
pub struct HomeAssistantConfig {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl HomeAssistantConfig {
    /// Core API endpoint as seen from inside an add-on container.
    pub const SUPERVISOR_URL: &'static str = "http://supervisor/core/api";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the Supervisor proxy with the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: Self::SUPERVISOR_URL.to_string(),
            token: token.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration for the Supervisor proxy, discovering the
    /// token from the process environment and well-known files.
    ///
    /// A missing token is logged and leaves the token empty; requests will
    /// then be rejected by the platform.
    #[must_use]
    pub fn from_supervisor_env() -> Self {
        let token = discover_token(|name| std::env::var(name).ok(), TOKEN_FILES);
        Self::new(token.unwrap_or_default())
    }

    /// Sets the API base URL. A trailing slash is removed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the access token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns `true` if a non-empty token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for HomeAssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeAssistantConfig")
            .field("base_url", &self.base_url)
            .field("token", &format_args!("<{} bytes>", self.token.len()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Looks up the Supervisor token.
///
/// `env` is queried for each of [`TOKEN_ENV_VARS`] first; then each path in
/// `files` is read. The first non-empty, trimmed value wins.
pub fn discover_token<E, P>(env: E, files: &[P]) -> Option<String>
where
    E: Fn(&str) -> Option<String>,
    P: AsRef<Path>,
{
    for name in TOKEN_ENV_VARS {
        if let Some(token) = env(name).filter(|t| !t.trim().is_empty()) {
            tracing::info!(source = *name, "Loaded token from environment");
            return Some(token.trim().to_string());
        }
    }

    for path in files {
        let path = path.as_ref();
        let Ok(contents) = fs::read_to_string(path) else {
            continue;
        };
        let token = contents.trim();
        if !token.is_empty() {
            tracing::info!(source = %path.display(), "Loaded token from file");
            return Some(token.to_string());
        }
    }

    tracing::warn!("No Supervisor token found");
    None
}

/// Tuning knobs for [`ThermostatManager`](crate::ThermostatManager).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    command_timeout: Duration,
    max_concurrent_commands: usize,
}

impl ManagerConfig {
    /// Default upper bound for a single device command.
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default number of device commands in flight at once.
    pub const DEFAULT_MAX_CONCURRENT_COMMANDS: usize = 4;

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upper bound for a single device command.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets how many device commands may be in flight at once.
    ///
    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_concurrent_commands(mut self, limit: usize) -> Self {
        self.max_concurrent_commands = limit.max(1);
        self
    }

    /// Returns the upper bound for a single device command.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Returns how many device commands may be in flight at once.
    #[must_use]
    pub fn max_concurrent_commands(&self) -> usize {
        self.max_concurrent_commands
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            command_timeout: Self::DEFAULT_COMMAND_TIMEOUT,
            max_concurrent_commands: Self::DEFAULT_MAX_CONCURRENT_COMMANDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn home_assistant_config_defaults() {
        let config = HomeAssistantConfig::new("abc");
        assert_eq!(config.base_url(), "http://supervisor/core/api");
        assert_eq!(config.token(), "abc");
        assert!(config.has_token());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let config = HomeAssistantConfig::new("secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<12 bytes>"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = HomeAssistantConfig::new("").with_base_url("http://ha:8123/api/");
        assert_eq!(config.base_url(), "http://ha:8123/api");
        assert!(!config.has_token());
    }

    #[test]
    fn token_from_first_env_var() {
        let env = |name: &str| match name {
            "SUPERVISOR_TOKEN" => Some("primary".to_string()),
            "HASSIO_TOKEN" => Some("legacy".to_string()),
            _ => None,
        };
        let files: &[&str] = &[];
        assert_eq!(discover_token(env, files), Some("primary".to_string()));
    }

    #[test]
    fn token_falls_back_to_legacy_env_var() {
        let env = |name: &str| (name == "HASSIO_TOKEN").then(|| "legacy".to_string());
        let files: &[&str] = &[];
        assert_eq!(discover_token(env, files), Some("legacy".to_string()));
    }

    #[test]
    fn token_from_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        let token = dir.path().join("token");
        fs::write(&empty, "  \n").unwrap();
        fs::write(&token, "file-token\n").unwrap();

        let missing = dir.path().join("missing");
        let files = [missing, empty, token];
        assert_eq!(discover_token(no_env, &files), Some("file-token".to_string()));
    }

    #[test]
    fn no_token_anywhere() {
        let files: &[&str] = &["/nonexistent/token"];
        assert_eq!(discover_token(no_env, files), None);
    }

    #[test]
    fn manager_config_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.command_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_concurrent_commands(), 4);
    }

    #[test]
    fn manager_config_concurrency_at_least_one() {
        let config = ManagerConfig::new().with_max_concurrent_commands(0);
        assert_eq!(config.max_concurrent_commands(), 1);
    }
}
