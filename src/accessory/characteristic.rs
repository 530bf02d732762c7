// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lightbulb characteristics and their values.

use std::fmt;

use crate::types::{Brightness, ColorTemperature, Hue, Saturation};

/// A lightbulb characteristic the host can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Mandatory on/off state.
    On,
    /// Cosmetic brightness.
    Brightness,
    /// Cosmetic color temperature.
    ColorTemperature,
    /// Cosmetic hue.
    Hue,
    /// Cosmetic saturation.
    Saturation,
}

impl Characteristic {
    /// Every characteristic, `On` first.
    pub const ALL: [Self; 5] = [
        Self::On,
        Self::Brightness,
        Self::ColorTemperature,
        Self::Hue,
        Self::Saturation,
    ];

    /// Returns the characteristic name as used by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Brightness => "Brightness",
            Self::ColorTemperature => "ColorTemperature",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
        }
    }

    /// Returns true for the cosmetic characteristics.
    #[must_use]
    pub const fn is_dummy(&self) -> bool {
        !matches!(self, Self::On)
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A characteristic value as exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicValue {
    /// Boolean value (`On`).
    Bool(bool),
    /// Integer value (cosmetic characteristics).
    Int(i64),
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Brightness> for CharacteristicValue {
    fn from(value: Brightness) -> Self {
        Self::Int(value.into())
    }
}

impl From<ColorTemperature> for CharacteristicValue {
    fn from(value: ColorTemperature) -> Self {
        Self::Int(value.into())
    }
}

impl From<Hue> for CharacteristicValue {
    fn from(value: Hue) -> Self {
        Self::Int(value.into())
    }
}

impl From<Saturation> for CharacteristicValue {
    fn from(value: Saturation) -> Self {
        Self::Int(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_on_is_mandatory() {
        let dummies: Vec<_> = Characteristic::ALL
            .iter()
            .filter(|c| c.is_dummy())
            .collect();
        assert_eq!(dummies.len(), 4);
        assert!(!Characteristic::On.is_dummy());
    }

    #[test]
    fn display_uses_host_names() {
        assert_eq!(
            Characteristic::ColorTemperature.to_string(),
            "ColorTemperature"
        );
    }

    #[test]
    fn typed_values_convert() {
        assert_eq!(
            CharacteristicValue::from(Saturation::new(30).unwrap()),
            CharacteristicValue::Int(30)
        );
        assert_eq!(
            CharacteristicValue::from(true),
            CharacteristicValue::Bool(true)
        );
    }
}
