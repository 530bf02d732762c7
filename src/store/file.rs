// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory-backed state store.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::store::StateStore;

/// On-disk representation of a stored value.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    key: String,
    value: bool,
    updated_at: DateTime<Utc>,
}

/// Stores each key as a JSON file inside a directory.
///
/// File names are the percent-encoded key with a `.json` suffix, so any
/// display name maps to a single file without escaping the directory.
/// Writes go through a temporary file that is renamed into place.
///
/// # Examples
///
/// ```no_run
/// use remo_toggle_light::store::{FileStore, StateStore};
///
/// # async fn example() -> Result<(), remo_toggle_light::error::PersistenceError> {
/// let store = FileStore::open("/var/lib/remo-toggle-light").await?;
/// store.save("Bedroom Light", true).await?;
/// assert_eq!(store.load("Bedroom Light").await?, Some(true));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Io` if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistenceError::Io {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    /// Returns the backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl StateStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<bool>, PersistenceError> {
        let path = self.path_for(key);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        match serde_json::from_str::<StoredEntry>(&contents) {
            Ok(entry) => Ok(Some(entry.value)),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring unparseable state entry: {e}");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, value: bool) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let entry = StoredEntry {
            key: key.to_string(),
            value,
            updated_at: Utc::now(),
        };
        let contents = serde_json::to_vec(&entry)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|source| PersistenceError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| PersistenceError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), value, "Saved state entry");
        Ok(())
    }
}
