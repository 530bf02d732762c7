// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration.
//!
//! The configuration is supplied once at construction and never mutated.
//! It deserializes from the same camelCase JSON object the host stores for
//! the accessory, so unknown keys such as `"accessory"` are ignored.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pulse::PulseCount;

/// Immutable identity and tuning of one toggle light accessory.
///
/// # Examples
///
/// ```
/// use remo_toggle_light::AccessoryConfig;
/// use std::time::Duration;
///
/// let config = AccessoryConfig::new("Bedroom Light", "toggle", "https://api.nature.global", "token")
///     .with_toggle_counts(1, 2)
///     .with_signal_delay(Duration::from_millis(500))
///     .with_dummy_settings(true);
///
/// assert_eq!(config.off_toggle_count().value(), 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    name: String,
    button_name: String,
    api_endpoint: String,
    access_token: String,
    #[serde(default = "default_toggle_count")]
    on_toggle_count: i32,
    #[serde(default = "default_toggle_count")]
    off_toggle_count: i32,
    #[serde(default = "default_signal_delay")]
    signal_delay: u64,
    #[serde(default = "default_pulse_timeout")]
    pulse_timeout: u64,
    #[serde(default)]
    enable_dummy_settings: bool,
}

fn default_toggle_count() -> i32 {
    1
}

fn default_signal_delay() -> u64 {
    AccessoryConfig::DEFAULT_SIGNAL_DELAY_MS
}

fn default_pulse_timeout() -> u64 {
    AccessoryConfig::DEFAULT_PULSE_TIMEOUT_MS
}

impl AccessoryConfig {
    /// Default delay between two pulses, in milliseconds.
    pub const DEFAULT_SIGNAL_DELAY_MS: u64 = 500;
    /// Default upper bound for a single pulse request, in milliseconds.
    pub const DEFAULT_PULSE_TIMEOUT_MS: u64 = 10_000;

    /// Creates a configuration with default counts, delay and timeout.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        button_name: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            button_name: button_name.into(),
            api_endpoint: api_endpoint.into(),
            access_token: access_token.into(),
            on_toggle_count: default_toggle_count(),
            off_toggle_count: default_toggle_count(),
            signal_delay: Self::DEFAULT_SIGNAL_DELAY_MS,
            pulse_timeout: Self::DEFAULT_PULSE_TIMEOUT_MS,
            enable_dummy_settings: false,
        }
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::MissingField` if a required field is blank.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, otherwise the
    /// same errors as [`AccessoryConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Sets the number of pulses used to switch on and off.
    #[must_use]
    pub fn with_toggle_counts(mut self, on: i32, off: i32) -> Self {
        self.on_toggle_count = on;
        self.off_toggle_count = off;
        self
    }

    /// Sets the delay between consecutive pulses.
    #[must_use]
    pub fn with_signal_delay(mut self, delay: Duration) -> Self {
        self.signal_delay = duration_to_millis(delay);
        self
    }

    /// Sets the upper bound for a single pulse request.
    #[must_use]
    pub fn with_pulse_timeout(mut self, timeout: Duration) -> Self {
        self.pulse_timeout = duration_to_millis(timeout);
        self
    }

    /// Enables or disables the cosmetic characteristics.
    #[must_use]
    pub fn with_dummy_settings(mut self, enabled: bool) -> Self {
        self.enable_dummy_settings = enabled;
        self
    }

    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("name", &self.name),
            ("buttonName", &self.button_name),
            ("apiEndpoint", &self.api_endpoint),
            ("accessToken", &self.access_token),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Display name, store key and appliance nickname to match.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the signal to fire.
    #[must_use]
    pub fn button_name(&self) -> &str {
        &self.button_name
    }

    /// Base endpoint of the cloud API.
    #[must_use]
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Bearer token for the cloud API.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Pulses sent when switching on.
    #[must_use]
    pub fn on_toggle_count(&self) -> PulseCount {
        PulseCount::from(self.on_toggle_count)
    }

    /// Pulses sent when switching off.
    #[must_use]
    pub fn off_toggle_count(&self) -> PulseCount {
        PulseCount::from(self.off_toggle_count)
    }

    /// Pulses sent to reach `desired`.
    #[must_use]
    pub fn toggle_count_for(&self, desired: bool) -> PulseCount {
        if desired {
            self.on_toggle_count()
        } else {
            self.off_toggle_count()
        }
    }

    /// Delay between consecutive pulses.
    #[must_use]
    pub fn signal_delay(&self) -> Duration {
        Duration::from_millis(self.signal_delay)
    }

    /// Upper bound for a single pulse request.
    #[must_use]
    pub fn pulse_timeout(&self) -> Duration {
        Duration::from_millis(self.pulse_timeout)
    }

    /// Whether brightness, color temperature, hue and saturation are exposed.
    #[must_use]
    pub fn dummy_settings_enabled(&self) -> bool {
        self.enable_dummy_settings
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
