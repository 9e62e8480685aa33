// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the thermostat manager.
//!
//! Errors fall into two groups. Operation-level errors ([`Error`]) abort a
//! whole adjustment or restore: invalid requests, a missing snapshot, or
//! storage failures. Per-device command failures ([`DeviceCommandError`])
//! are collected into an [`Outcome`](crate::manager::Outcome) instead and
//! never abort a batch.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected before touching storage or devices.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A restore was requested but no original temperatures are stored.
    #[error("no original temperatures are stored")]
    NoSnapshot,

    /// The snapshot could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The device platform could not be queried.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl Error {
    /// Returns `true` for errors that describe a normal empty state rather
    /// than a failure.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NoSnapshot)
    }
}

/// Errors raised while validating an adjustment or restore request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An offset of zero would change nothing.
    #[error("offset must not be zero")]
    ZeroOffset,

    /// The requested offset or temperature is NaN or infinite.
    #[error("temperature value {0} is not a finite number")]
    NonFiniteTemperature(f64),

    /// None of the requested devices are known.
    #[error("no thermostats selected")]
    NoTargets,
}

/// Errors related to the persisted snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or removing the snapshot file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to communication with the device platform.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The platform rejected the access token.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The platform answered with a non-success status.
    #[error("unexpected status {status} - {reason}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The response body could not be understood.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// A set-temperature command that failed for a single device.
///
/// There is deliberately no conversion from this type into [`Error`]: a
/// failing device can only be recorded in a batch outcome, never used to
/// abort the batch with `?`.
#[derive(Debug, Error)]
#[error("error at {device_id}: {kind}")]
pub struct DeviceCommandError {
    /// The device the command was sent to.
    pub device_id: String,
    /// What went wrong.
    #[source]
    pub kind: GatewayError,
}

impl DeviceCommandError {
    /// Creates a new per-device error.
    #[must_use]
    pub fn new(device_id: impl Into<String>, kind: GatewayError) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::ZeroOffset.to_string(),
            "offset must not be zero"
        );
        assert_eq!(
            ValidationError::NoTargets.to_string(),
            "no thermostats selected"
        );
    }

    #[test]
    fn error_from_validation_error() {
        let err: Error = ValidationError::ZeroOffset.into();
        assert!(matches!(err, Error::Validation(ValidationError::ZeroOffset)));
    }

    #[test]
    fn device_command_error_names_device() {
        let err = DeviceCommandError::new("climate.kitchen", GatewayError::AuthenticationFailed);
        assert_eq!(
            err.to_string(),
            "error at climate.kitchen: authentication failed"
        );
    }

    #[test]
    fn storage_error_display_includes_path() {
        let err = StorageError::Io {
            path: PathBuf::from("/data/original_temps.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/original_temps.json"));
    }

    #[test]
    fn no_snapshot_is_informational() {
        assert!(Error::NoSnapshot.is_informational());
        assert!(!Error::from(ValidationError::NoTargets).is_informational());
    }
}
