// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing lightbulb accessory.
//!
//! [`LightbulbAccessory`] adapts the get/set handlers a home-automation host
//! expects onto a [`ToggleReconciler`]. The mandatory `On` characteristic is
//! backed by the reconciler; brightness, color temperature, hue and
//! saturation are optional in-memory values that only exist so the host can
//! show its usual lightbulb controls.
//!
//! Every handler, including the cosmetic ones, waits until no transition is
//! in flight so the host always sees a consistent snapshot.

mod characteristic;
mod host;

pub use characteristic::{Characteristic, CharacteristicValue};
pub use host::HostContext;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::AccessoryConfig;
use crate::error::{Error, Result};
use crate::protocol::SignalTransport;
use crate::reconciler::{ToggleReconciler, TransitionReport};
use crate::store::StateStore;
use crate::types::{Brightness, ColorTemperature, Hue, Saturation};

#[cfg(feature = "http")]
use crate::protocol::{HttpConfig, RemoClient};
#[cfg(feature = "http")]
use crate::store::FileStore;

/// Cosmetic values echoed back to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DummySettings {
    /// Brightness slider value.
    pub brightness: Brightness,
    /// Color temperature slider value.
    pub color_temperature: ColorTemperature,
    /// Hue slider value.
    pub hue: Hue,
    /// Saturation slider value.
    pub saturation: Saturation,
}

/// One lightbulb accessory as exposed to the host.
///
/// # Examples
///
/// ```no_run
/// use remo_toggle_light::{AccessoryConfig, HostContext, LightbulbAccessory};
///
/// # async fn example() -> remo_toggle_light::Result<()> {
/// let host = HostContext::new("/var/lib/remo-toggle-light");
/// let config = AccessoryConfig::new("Bedroom Light", "toggle", "https://api.nature.global", "token");
///
/// let light = LightbulbAccessory::from_config(config, &host).await?;
/// light.set_on(true).await?;
/// assert!(light.get_on().await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LightbulbAccessory<T, S> {
    reconciler: Arc<ToggleReconciler<T, S>>,
    dummy: RwLock<DummySettings>,
    dummy_enabled: bool,
}

#[cfg(feature = "http")]
impl LightbulbAccessory<RemoClient, FileStore> {
    /// Builds an accessory talking to the Nature Remo cloud and persisting
    /// into the host's persist directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid configuration, `Error::Protocol`
    /// if the HTTP client cannot be created and `Error::Persistence` if the
    /// persist directory cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn from_config(config: AccessoryConfig, host: &HostContext) -> Result<Self> {
        config.validate()?;

        let client = HttpConfig::new(config.api_endpoint(), config.access_token())
            .with_timeout(config.pulse_timeout())
            .into_client()?;
        let store = FileStore::open(host.persist_path()).await?;

        Ok(Self::new(config, Arc::new(client), Arc::new(store)))
    }
}

impl<T, S> LightbulbAccessory<T, S>
where
    T: SignalTransport + 'static,
    S: StateStore + 'static,
{
    /// Creates the accessory and starts bootstrap in the background.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(config: AccessoryConfig, transport: Arc<T>, store: Arc<S>) -> Self {
        let dummy_enabled = config.dummy_settings_enabled();
        let reconciler = Arc::new(ToggleReconciler::new(config, transport, store));

        tokio::spawn({
            let reconciler = Arc::clone(&reconciler);
            async move {
                reconciler.initialize().await;
            }
        });

        Self {
            reconciler,
            dummy: RwLock::new(DummySettings::default()),
            dummy_enabled,
        }
    }

    /// Display name of the accessory.
    #[must_use]
    pub fn name(&self) -> &str {
        self.reconciler.config().name()
    }

    /// Returns the underlying reconciler.
    #[must_use]
    pub fn reconciler(&self) -> &ToggleReconciler<T, S> {
        &self.reconciler
    }

    /// Characteristics exposed to the host.
    #[must_use]
    pub fn characteristics(&self) -> Vec<Characteristic> {
        Characteristic::ALL
            .into_iter()
            .filter(|c| self.supports(*c))
            .collect()
    }

    /// Returns true if `characteristic` is exposed.
    #[must_use]
    pub fn supports(&self, characteristic: Characteristic) -> bool {
        !characteristic.is_dummy() || self.dummy_enabled
    }

    // ========== On ==========

    /// Returns the believed on/off state.
    pub async fn get_on(&self) -> bool {
        self.reconciler.get_state().await
    }

    /// Switches the light on or off.
    ///
    /// Pulse delivery failures are not reported as an error; inspect the
    /// returned report instead.
    ///
    /// # Errors
    ///
    /// Currently never fails; the `Result` keeps the handler signature
    /// uniform with the cosmetic setters.
    pub async fn set_on(&self, on: bool) -> Result<TransitionReport> {
        Ok(self.reconciler.set_state(on).await)
    }

    // ========== Cosmetic characteristics ==========

    /// Returns the brightness value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn get_brightness(&self) -> Result<Brightness> {
        Ok(self.read_dummy(Characteristic::Brightness).await?.brightness)
    }

    /// Stores a brightness value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn set_brightness(&self, value: Brightness) -> Result<()> {
        self.write_dummy(Characteristic::Brightness, |d| d.brightness = value)
            .await
    }

    /// Returns the color temperature value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn get_color_temperature(&self) -> Result<ColorTemperature> {
        Ok(self
            .read_dummy(Characteristic::ColorTemperature)
            .await?
            .color_temperature)
    }

    /// Stores a color temperature value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn set_color_temperature(&self, value: ColorTemperature) -> Result<()> {
        self.write_dummy(Characteristic::ColorTemperature, |d| {
            d.color_temperature = value;
        })
        .await
    }

    /// Returns the hue value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn get_hue(&self) -> Result<Hue> {
        Ok(self.read_dummy(Characteristic::Hue).await?.hue)
    }

    /// Stores a hue value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn set_hue(&self, value: Hue) -> Result<()> {
        self.write_dummy(Characteristic::Hue, |d| d.hue = value).await
    }

    /// Returns the saturation value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn get_saturation(&self) -> Result<Saturation> {
        Ok(self.read_dummy(Characteristic::Saturation).await?.saturation)
    }

    /// Stores a saturation value.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` if dummy settings are
    /// disabled.
    pub async fn set_saturation(&self, value: Saturation) -> Result<()> {
        self.write_dummy(Characteristic::Saturation, |d| d.saturation = value)
            .await
    }

    // ========== Generic dispatch ==========

    /// Reads any exposed characteristic.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` for a characteristic that
    /// is not exposed.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let value = match characteristic {
            Characteristic::On => CharacteristicValue::Bool(self.get_on().await),
            Characteristic::Brightness => self.get_brightness().await?.into(),
            Characteristic::ColorTemperature => self.get_color_temperature().await?.into(),
            Characteristic::Hue => self.get_hue().await?.into(),
            Characteristic::Saturation => self.get_saturation().await?.into(),
        };
        Ok(value)
    }

    /// Writes any exposed characteristic.
    ///
    /// # Errors
    ///
    /// Returns `Error::CharacteristicNotSupported` for a characteristic that
    /// is not exposed, `Error::InvalidValue` for a value of the wrong kind
    /// and `Error::Value` for an out-of-range number.
    pub async fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<()> {
        if !self.supports(characteristic) {
            return Err(Error::CharacteristicNotSupported(characteristic));
        }

        match (characteristic, value) {
            (Characteristic::On, CharacteristicValue::Bool(on)) => {
                self.set_on(on).await?;
                Ok(())
            }
            (Characteristic::Brightness, CharacteristicValue::Int(v)) => {
                self.set_brightness(Brightness::try_from(v)?).await
            }
            (Characteristic::ColorTemperature, CharacteristicValue::Int(v)) => {
                self.set_color_temperature(ColorTemperature::try_from(v)?)
                    .await
            }
            (Characteristic::Hue, CharacteristicValue::Int(v)) => {
                self.set_hue(Hue::try_from(v)?).await
            }
            (Characteristic::Saturation, CharacteristicValue::Int(v)) => {
                self.set_saturation(Saturation::try_from(v)?).await
            }
            (characteristic, _) => Err(Error::InvalidValue(characteristic)),
        }
    }

    async fn read_dummy(&self, characteristic: Characteristic) -> Result<DummySettings> {
        self.ensure_dummy(characteristic)?;
        self.reconciler.wait_idle().await;
        let settings = *self.dummy.read();
        tracing::info!(accessory = %self.name(), "Getting {characteristic}: {settings:?}");
        Ok(settings)
    }

    async fn write_dummy(
        &self,
        characteristic: Characteristic,
        update: impl FnOnce(&mut DummySettings),
    ) -> Result<()> {
        self.ensure_dummy(characteristic)?;
        self.reconciler.wait_idle().await;
        update(&mut *self.dummy.write());
        tracing::info!(accessory = %self.name(), "Setting {characteristic}");
        Ok(())
    }

    fn ensure_dummy(&self, characteristic: Characteristic) -> Result<()> {
        if self.supports(characteristic) {
            Ok(())
        } else {
            Err(Error::CharacteristicNotSupported(characteristic))
        }
    }
}
