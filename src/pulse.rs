// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pulse delivery.
//!
//! A pulse sequence fires the same action a configured number of times with
//! a fixed delay between consecutive attempts. Individual failures are
//! logged and counted but never stop the sequence.

use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// Configured number of pulses for one direction.
///
/// The raw value is kept as configured. [`PulseCount::pulses`] maps it to
/// the number of actions that are actually executed:
///
/// | configured | executed |
/// |------------|----------|
/// | `< 0`      | 0        |
/// | `0`        | 1        |
/// | `n >= 1`   | `n`      |
///
/// Zero behaving like one is long-standing behavior that existing
/// configurations rely on.
///
/// # Examples
///
/// ```
/// use remo_toggle_light::pulse::PulseCount;
///
/// assert_eq!(PulseCount::new(-1).pulses(), 0);
/// assert_eq!(PulseCount::new(0).pulses(), 1);
/// assert_eq!(PulseCount::new(3).pulses(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PulseCount(i32);

impl PulseCount {
    /// Wraps a configured count.
    #[must_use]
    pub const fn new(count: i32) -> Self {
        Self(count)
    }

    /// Returns the configured value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Returns how many times the action runs.
    #[must_use]
    pub const fn pulses(&self) -> u32 {
        if self.0 < 0 {
            0
        } else if self.0 == 0 {
            1
        } else {
            self.0.unsigned_abs()
        }
    }
}

impl fmt::Display for PulseCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PulseCount {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

/// Outcome of one pulse sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseReport {
    /// Number of actions executed.
    pub attempted: u32,
    /// Number of actions that returned an error.
    pub failed: u32,
}

impl PulseReport {
    /// Number of actions that succeeded.
    #[must_use]
    pub const fn delivered(&self) -> u32 {
        self.attempted - self.failed
    }

    /// Returns true if every attempted action succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Runs `action` according to `count`, sleeping `delay` between runs.
///
/// The action receives the 1-based attempt number. Errors are logged at
/// error level and counted in the returned report.
pub async fn repeat<F, Fut>(count: PulseCount, delay: Duration, mut action: F) -> PulseReport
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let total = count.pulses();
    let mut report = PulseReport::default();

    for attempt in 1..=total {
        if attempt > 1 {
            tokio::time::sleep(delay).await;
        }

        report.attempted += 1;
        if let Err(e) = action(attempt).await {
            report.failed += 1;
            tracing::error!(attempt, total, "Error sending toggle signal: {e}");
        }
    }

    report
}
