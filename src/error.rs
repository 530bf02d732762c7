// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the toggle light bridge.
//!
//! Errors are grouped by where they originate: signal resolution during
//! bootstrap, transport failures talking to the Nature Remo cloud,
//! persistence of the believed state, configuration, and validation of
//! cosmetic characteristic values.
//!
//! Only configuration and value errors ever reach a caller of the
//! accessory surface. Resolution, transport and persistence errors are
//! logged where they happen and the bridge carries on.

use std::path::PathBuf;

use thiserror::Error;

use crate::accessory::Characteristic;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// No appliance with the configured nickname exists on the account.
    #[error("could not find appliance: {0}")]
    ApplianceNotFound(String),

    /// The appliance exists but has no signal with the configured label.
    #[error("could not find button {button:?} on appliance {appliance:?}")]
    SignalNotFound {
        /// Nickname of the matched appliance.
        appliance: String,
        /// The configured button label.
        button: String,
    },

    /// A pulse was requested but the signal id was never resolved.
    #[error("signal id is not resolved")]
    SignalUnresolved,

    /// Communication with the remote signal service failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Reading or writing the believed state failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// The accessory configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A characteristic value is outside its allowed range.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The characteristic is not exposed by this accessory.
    #[error("characteristic {0} is not supported")]
    CharacteristicNotSupported(Characteristic),

    /// The value type does not match the characteristic.
    #[error("invalid value for characteristic {0}")]
    InvalidValue(Characteristic),
}

/// Errors related to the remote signal service.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The access token was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid API endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors related to the durable state store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be serialized.
    #[error("failed to encode entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors related to accessory configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_protocol_error() {
        let err: Error = ProtocolError::Timeout(500).into();
        assert!(matches!(err, Error::Protocol(ProtocolError::Timeout(500))));
        assert_eq!(
            err.to_string(),
            "protocol error: request timed out after 500 ms"
        );
    }

    #[test]
    fn signal_not_found_display() {
        let err = Error::SignalNotFound {
            appliance: "Bedroom".to_string(),
            button: "toggle".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not find button \"toggle\" on appliance \"Bedroom\""
        );
    }

    #[test]
    fn status_error_display() {
        let err = ProtocolError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 - Service Unavailable");
    }

    #[test]
    fn characteristic_not_supported_display() {
        let err = Error::CharacteristicNotSupported(Characteristic::Hue);
        assert_eq!(err.to_string(), "characteristic Hue is not supported");
    }
}
