// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capabilities the host hands to each accessory.

use std::path::{Path, PathBuf};

/// Host-provided resources, passed explicitly into accessory constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    persist_path: PathBuf,
}

impl HostContext {
    /// Creates a context whose persistent data lives under `persist_path`.
    #[must_use]
    pub fn new(persist_path: impl Into<PathBuf>) -> Self {
        Self {
            persist_path: persist_path.into(),
        }
    }

    /// Directory accessories may use for durable state.
    #[must_use]
    pub fn persist_path(&self) -> &Path {
        &self.persist_path
    }
}
