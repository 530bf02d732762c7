// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remo Toggle Light - expose a toggle-only infrared light as a lightbulb.
//!
//! Many ceiling lights ship with an infrared remote that has a single
//! button: every press flips the light. This library fires that button
//! through the Nature Remo cloud API and presents the result to a
//! home-automation host as an ordinary on/off lightbulb.
//!
//! # Features
//!
//! - **Toggle reconciliation**: the believed state is compared with the
//!   requested one and the configured number of pulses is sent only when
//!   they differ
//! - **Durable state**: the believed state survives restarts
//! - **Serialized transitions**: concurrent requests never interleave their
//!   pulse sequences
//! - **Cosmetic characteristics**: optional brightness, color temperature,
//!   hue and saturation values for hosts that expect them
//!
//! # Quick Start
//!
//! ```no_run
//! use remo_toggle_light::{AccessoryConfig, HostContext, LightbulbAccessory};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> remo_toggle_light::Result<()> {
//!     let host = HostContext::new("/var/lib/remo-toggle-light");
//!     let config = AccessoryConfig::new(
//!         "Bedroom Light",
//!         "toggle",
//!         "https://api.nature.global",
//!         "my-access-token",
//!     )
//!     .with_toggle_counts(1, 2)
//!     .with_signal_delay(Duration::from_millis(500));
//!
//!     let light = LightbulbAccessory::from_config(config, &host).await?;
//!
//!     let report = light.set_on(true).await?;
//!     if !report.is_clean() {
//!         eprintln!("{} pulses failed", report.pulses.failed);
//!     }
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod config;
pub mod error;
pub mod protocol;
pub mod pulse;
pub mod reconciler;
pub mod store;
pub mod types;

pub use accessory::{Characteristic, CharacteristicValue, HostContext, LightbulbAccessory};
pub use config::AccessoryConfig;
pub use error::{ConfigError, Error, PersistenceError, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, RemoClient};
pub use protocol::{Appliance, Signal, SignalTransport};
pub use pulse::{PulseCount, PulseReport};
pub use reconciler::{ToggleReconciler, TransitionReport};
pub use store::{FileStore, MemoryStore, StateStore};
pub use types::{Brightness, ColorTemperature, Hue, Saturation};
