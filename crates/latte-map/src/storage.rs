//! Client-local key-value persistence.
//!
//! [`LocalStore`] is a flat JSON object of string keys to string values kept
//! in a single file, read and rewritten whole on every access. Layer
//! preferences live under [`LAYERS_KEY`] as the JSON encoding of
//! [`LayerState`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use latte_core::LayerState;

use crate::error::StoreError;

pub const LAYERS_KEY: &str = "mapLayers";

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value stored under `key`, or `None` if the key or the file
    /// is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a JSON string map.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.read_all()?;
        Ok(entries.remove(key))
    }

    /// Stores `value` under `key`, creating the file and its parent
    /// directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on any filesystem failure. An existing file
    /// that is not a JSON string map is replaced rather than reported.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Json { source, .. }) => {
                tracing::warn!(path = %self.path.display(), error = %source, "overwriting corrupt local store");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Json {
            path: self.path.display().to_string(),
            source: e,
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Json {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Loads persisted layer toggles.
///
/// Falls back to the all-enabled default when nothing is stored or the
/// stored value cannot be read; the latter is logged.
#[must_use]
pub fn load_layers(store: &LocalStore) -> LayerState {
    let raw = match store.get(LAYERS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LayerState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read layer preferences; using defaults");
            return LayerState::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, key = LAYERS_KEY, "corrupt layer preferences; using defaults");
        LayerState::default()
    })
}

/// Persists layer toggles under [`LAYERS_KEY`].
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be written.
pub fn save_layers(store: &LocalStore, layers: &LayerState) -> Result<(), StoreError> {
    let value = serde_json::to_string(layers).map_err(|e| StoreError::Json {
        path: store.path().display().to_string(),
        source: e,
    })?;
    store.set(LAYERS_KEY, &value)
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
