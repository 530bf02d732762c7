// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state store.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::PersistenceError;
use crate::store::StateStore;

/// Process-local store backed by a map.
///
/// Counts writes so callers can assert that no-op transitions do not
/// touch storage, and can be switched into a failing mode to exercise
/// error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, bool>>,
    writes: Mutex<usize>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: bool) -> Self {
        let store = Self::new();
        store.values.lock().insert(key.into(), value);
        store
    }

    /// Returns the value currently stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.lock().get(key).copied()
    }

    /// Returns how many times `save` has succeeded.
    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }

    /// Makes every `load` and `save` fail while `failing` is set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io {
                path: PathBuf::from(key),
                source: io::Error::other("store unavailable"),
            });
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<bool>, PersistenceError> {
        self.check(key)?;
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: bool) -> Result<(), PersistenceError> {
        self.check(key)?;
        self.values.lock().insert(key.to_string(), value);
        *self.writes.lock() += 1;
        Ok(())
    }
}
