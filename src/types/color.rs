// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color characteristic values.
//!
//! Color temperature, hue and saturation are exposed only so the host shows
//! its usual lightbulb controls. None of them reach the infrared light.

use std::fmt;

use crate::error::ValueError;

fn out_of_range(min: u16, max: u16, actual: i64) -> ValueError {
    ValueError::OutOfRange {
        min: i64::from(min),
        max: i64::from(max),
        actual,
    }
}

/// Color temperature in mireds (140-500).
///
/// Lower values are cooler, higher values are warmer.
///
/// # Examples
///
/// ```
/// use remo_toggle_light::types::ColorTemperature;
///
/// let ct = ColorTemperature::new(250).unwrap();
/// assert_eq!(ct.value(), 250);
/// assert_eq!(ct.to_kelvin(), 4000);
/// assert!(ColorTemperature::new(100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Minimum color temperature (coolest, ~7100K).
    pub const MIN: u16 = 140;

    /// Maximum color temperature (warmest, 2000K).
    pub const MAX: u16 = 500;

    /// Creates a new color temperature value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [140, 500].
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(out_of_range(Self::MIN, Self::MAX, i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Returns the color temperature in mireds.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the approximate color temperature in Kelvin.
    #[must_use]
    pub fn to_kelvin(&self) -> u32 {
        1_000_000 / u32::from(self.0)
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mired", self.0)
    }
}

impl TryFrom<i64> for ColorTemperature {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed =
            u16::try_from(value).map_err(|_| out_of_range(Self::MIN, Self::MAX, value))?;
        Self::new(narrowed)
    }
}

impl From<ColorTemperature> for i64 {
    fn from(value: ColorTemperature) -> Self {
        Self::from(value.0)
    }
}

/// Hue in degrees (0-360).
///
/// # Examples
///
/// ```
/// use remo_toggle_light::types::Hue;
///
/// assert_eq!(Hue::new(120).unwrap().value(), 120);
/// assert_eq!(Hue::default().value(), 360);
/// assert!(Hue::new(361).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hue(u16);

impl Hue {
    /// Maximum hue value.
    pub const MAX: u16 = 360;

    /// Creates a new hue value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 360.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(out_of_range(0, Self::MAX, i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for Hue {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<i64> for Hue {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed = u16::try_from(value).map_err(|_| out_of_range(0, Self::MAX, value))?;
        Self::new(narrowed)
    }
}

impl From<Hue> for i64 {
    fn from(value: Hue) -> Self {
        Self::from(value.0)
    }
}

/// Saturation as a percentage (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Saturation(u8);

impl Saturation {
    /// Maximum saturation value.
    pub const MAX: u8 = 100;

    /// Creates a new saturation value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(out_of_range(0, u16::from(Self::MAX), i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl fmt::Display for Saturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for Saturation {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed =
            u8::try_from(value).map_err(|_| out_of_range(0, u16::from(Self::MAX), value))?;
        Self::new(narrowed)
    }
}

impl From<Saturation> for i64 {
    fn from(value: Saturation) -> Self {
        Self::from(value.0)
    }
}
