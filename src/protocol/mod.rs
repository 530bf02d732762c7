// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote signal client for the Nature Remo cloud API.
//!
//! The bridge needs exactly two things from the vendor API: the list of
//! registered appliances (to resolve a button label to a signal id once at
//! startup) and a way to fire a stored infrared signal.
//!
//! # Implementations
//!
//! - [`RemoClient`]: HTTP client speaking the Nature Remo `/1` API
//!
//! The [`SignalTransport`] trait is the seam the reconciler is written
//! against, so tests can substitute an in-process fake.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, RemoClient};

use serde::Deserialize;

use crate::error::ProtocolError;

/// An appliance registered on the Nature Remo account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Appliance {
    /// Appliance id, when the API reports one.
    #[serde(default)]
    pub id: Option<String>,
    /// User-facing name of the appliance.
    pub nickname: String,
    /// Infrared signals learned for this appliance.
    #[serde(default)]
    pub signals: Vec<Signal>,
}

impl Appliance {
    /// Finds a signal whose trimmed label equals the trimmed `label`.
    #[must_use]
    pub fn find_signal(&self, label: &str) -> Option<&Signal> {
        let label = label.trim();
        self.signals.iter().find(|signal| signal.name.trim() == label)
    }
}

/// A learned infrared signal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Signal {
    /// Opaque signal identifier used to fire the signal.
    pub id: String,
    /// Button label of the signal.
    pub name: String,
}

/// Finds an appliance whose trimmed nickname equals the trimmed `name`.
#[must_use]
pub fn find_appliance<'a>(appliances: &'a [Appliance], name: &str) -> Option<&'a Appliance> {
    let name = name.trim();
    appliances
        .iter()
        .find(|appliance| appliance.nickname.trim() == name)
}

/// Transport able to list appliances and fire stored signals.
pub trait SignalTransport: Send + Sync {
    /// Lists every appliance on the account together with its signals.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure or a non-success status.
    fn list_appliances(
        &self,
    ) -> impl Future<Output = Result<Vec<Appliance>, ProtocolError>> + Send;

    /// Fires the signal identified by `signal_id` once.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure or a non-success status.
    fn send_signal(&self, signal_id: &str)
    -> impl Future<Output = Result<(), ProtocolError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appliances() -> Vec<Appliance> {
        serde_json::from_value(serde_json::json!([
            {
                "id": "a-1",
                "nickname": "Living Room",
                "type": "IR",
                "signals": [
                    { "id": "s-1", "name": "power", "image": "ico_on" },
                    { "id": "s-2", "name": " night ", "image": "ico_off" }
                ]
            },
            {
                "nickname": " Bedroom  ",
                "signals": []
            },
            {
                "nickname": "Aircon"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let list = appliances();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id.as_deref(), Some("a-1"));
        assert_eq!(list[0].signals[0].id, "s-1");
        assert!(list[2].signals.is_empty());
    }

    #[test]
    fn find_appliance_trims_both_sides() {
        let list = appliances();
        let found = find_appliance(&list, "Bedroom ").unwrap();
        assert_eq!(found.nickname, " Bedroom  ");
    }

    #[test]
    fn find_appliance_is_case_sensitive() {
        let list = appliances();
        assert!(find_appliance(&list, "living room").is_none());
    }

    #[test]
    fn find_signal_trims_labels() {
        let list = appliances();
        let living = find_appliance(&list, "Living Room").unwrap();
        assert_eq!(living.find_signal("night").unwrap().id, "s-2");
        assert_eq!(living.find_signal(" power").unwrap().id, "s-1");
        assert!(living.find_signal("off").is_none());
    }
}
