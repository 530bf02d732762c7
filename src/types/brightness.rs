// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness characteristic value.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// The value is cosmetic: it is echoed back to the host but never changes
/// what is sent to the light.
///
/// # Examples
///
/// ```
/// use remo_toggle_light::types::Brightness;
///
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
/// assert_eq!(Brightness::default(), Brightness::MAX);
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness (0%).
    pub const MIN: Self = Self(0);

    /// Maximum brightness (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN.0),
                max: i64::from(Self::MAX.0),
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let narrowed = u8::try_from(value).map_err(|_| ValueError::OutOfRange {
            min: i64::from(Self::MIN.0),
            max: i64::from(Self::MAX.0),
            actual: value,
        })?;
        Self::new(narrowed)
    }
}

impl From<Brightness> for i64 {
    fn from(value: Brightness) -> Self {
        Self::from(value.0)
    }
}
