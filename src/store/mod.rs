// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable storage of the believed on/off state.
//!
//! Values are keyed by accessory display name and survive process restarts.
//! The store is read once at bootstrap and written after each completed
//! transition.
//!
//! # Implementations
//!
//! - [`FileStore`]: one JSON file per key inside a directory
//! - [`MemoryStore`]: process-local map, useful for tests and dry runs

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::PersistenceError;

/// Key-value persistence for believed accessory state.
pub trait StateStore: Send + Sync {
    /// Reads the stored value for `key`.
    ///
    /// Returns `Ok(None)` when nothing usable is stored, including entries
    /// that exist but cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backend cannot be read at all.
    fn load(&self, key: &str)
    -> impl Future<Output = Result<Option<bool>, PersistenceError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the value cannot be written.
    fn save(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
