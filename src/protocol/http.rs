// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the Nature Remo cloud API.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::ProtocolError;
use crate::protocol::{Appliance, SignalTransport};

// ============================================================================
// HttpConfig - Connection parameters for the cloud API
// ============================================================================

/// Configuration for the Nature Remo HTTP client.
///
/// # Examples
///
/// ```
/// use remo_toggle_light::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("https://api.nature.global/", "secret-token")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url().unwrap(), "https://api.nature.global/1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    endpoint: String,
    access_token: String,
    timeout: Duration,
}

impl HttpConfig {
    /// API version segment appended to the endpoint.
    pub const API_VERSION: &'static str = "1";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given endpoint and bearer token.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured endpoint as given.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the versioned base URL.
    ///
    /// Trailing slashes on the endpoint are stripped before `/1` is appended.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidEndpoint` if nothing is left of the
    /// endpoint after stripping.
    pub fn base_url(&self) -> Result<String, ProtocolError> {
        let trimmed = self.endpoint.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ProtocolError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(format!("{trimmed}/{}", Self::API_VERSION))
    }

    /// Creates a `RemoClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> Result<RemoClient, ProtocolError> {
        let base_url = self.base_url()?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(RemoClient {
            base_url,
            client,
            access_token: self.access_token,
        })
    }
}

// ============================================================================
// RemoClient
// ============================================================================

/// HTTP client for the Nature Remo cloud API.
///
/// Every request carries an `Authorization: Bearer <token>` header.
///
/// # Examples
///
/// ```no_run
/// use remo_toggle_light::protocol::{HttpConfig, SignalTransport};
///
/// # async fn example() -> Result<(), remo_toggle_light::error::ProtocolError> {
/// let client = HttpConfig::new("https://api.nature.global", "token").into_client()?;
/// for appliance in client.list_appliances().await? {
///     println!("{}", appliance.nickname);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RemoClient {
    base_url: String,
    client: Client,
    access_token: String,
}

impl RemoClient {
    /// Returns the versioned base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn appliances_url(&self) -> String {
        format!("{}/appliances", self.base_url)
    }

    fn send_url(&self, signal_id: &str) -> String {
        format!(
            "{}/signals/{}/send",
            self.base_url,
            urlencoding::encode(signal_id)
        )
    }

    fn check_status(response: &Response) -> Result<(), ProtocolError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProtocolError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RemoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SignalTransport for RemoClient {
    async fn list_appliances(&self) -> Result<Vec<Appliance>, ProtocolError> {
        let url = self.appliances_url();

        tracing::debug!(url = %url, "Listing appliances");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::check_status(&response)?;

        let body = response.text().await.map_err(ProtocolError::Http)?;
        let appliances: Vec<Appliance> = serde_json::from_str(&body)?;

        tracing::debug!(count = appliances.len(), "Received appliance list");

        Ok(appliances)
    }

    async fn send_signal(&self, signal_id: &str) -> Result<(), ProtocolError> {
        let url = self.send_url(signal_id);

        tracing::debug!(url = %url, "Sending signal");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::check_status(&response)
    }
}
