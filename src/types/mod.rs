// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the cosmetic lightbulb characteristics.
//!
//! Each type ensures values are within the range the host accepts at
//! construction time.
//!
//! # Types
//!
//! - [`Brightness`] - Brightness level (0-100%)
//! - [`ColorTemperature`] - Color temperature in mireds (140-500)
//! - [`Hue`] - Hue in degrees (0-360)
//! - [`Saturation`] - Saturation (0-100%)

mod brightness;
mod color;

pub use brightness::Brightness;
pub use color::{ColorTemperature, Hue, Saturation};
