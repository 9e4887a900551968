//! Persisted preference storage.
//!
//! The coordinator reads the stored [`Preference`] once at startup and
//! writes it back after every accepted change. Stores are key-value: a
//! single file or map can hold other application keys next to the theme.
//!
//! Two stores ship with the crate:
//!
//! - [`MemoryStore`]: in-process map; clones share the same data, so a
//!   second coordinator built from a clone sees what the first one wrote.
//! - [`FileStore`]: a JSON object on disk (`{"theme": "dark"}`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::preference::{ParsePreferenceError, Preference};

/// Default key the preference is stored under.
pub const STORAGE_KEY: &str = "theme";

/// Errors from reading or writing a preference store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preference file {path} is not a JSON object: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored value for '{key}' is invalid: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: ParsePreferenceError,
    },

    #[error("preference store is unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage for the theme preference.
pub trait PreferenceStore {
    /// Returns the stored preference, or `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<Preference>, StoreError>;

    /// Stores a preference under `key`.
    fn write(&mut self, key: &str, preference: Preference) -> Result<(), StoreError>;
}

/// In-memory preference store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw value, bypassing validation.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Preference>, StoreError> {
        match self.values.borrow().get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|source| StoreError::InvalidValue {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    fn write(&mut self, key: &str, preference: Preference) -> Result<(), StoreError> {
        self.insert_raw(key, preference.as_str());
        Ok(())
    }
}

/// JSON file backed preference store.
///
/// The file holds a JSON object. The preference is a string value; other
/// keys may hold any JSON and are preserved on write. A missing file reads
/// as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Preference>, StoreError> {
        let parsed = match self.load()?.get(key) {
            None => return Ok(None),
            Some(Value::String(raw)) => raw.parse(),
            Some(other) => Err(ParsePreferenceError {
                value: other.to_string(),
            }),
        };
        parsed.map(Some).map_err(|source| StoreError::InvalidValue {
            key: key.to_string(),
            source,
        })
    }

    fn write(&mut self, key: &str, preference: Preference) -> Result<(), StoreError> {
        let mut values = match self.load() {
            Ok(values) => values,
            Err(e @ StoreError::Malformed { .. }) => {
                tracing::warn!(error = %e, "replacing unparsable preference file");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), Value::from(preference.as_str()));

        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(&values).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn test_memory_store_absent_key() {
        let store = MemoryStore::new();
        assert!(store.read(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let mut store = MemoryStore::new();
        let reopened = store.clone();
        store.write(STORAGE_KEY, Preference::Dark).unwrap();
        assert_eq!(reopened.read(STORAGE_KEY).unwrap(), Some(Preference::Dark));
        assert_eq!(reopened.raw(STORAGE_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_memory_store_invalid_value() {
        let store = MemoryStore::new();
        store.insert_raw(STORAGE_KEY, "neon");
        let err = store.read(STORAGE_KEY).unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert!(store.read(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut store = FileStore::new(&path);
        store.write(STORAGE_KEY, Preference::Light).unwrap();

        let fresh = FileStore::new(&path);
        assert_eq!(fresh.read(STORAGE_KEY).unwrap(), Some(Preference::Light));
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"wallet": "connected"}"#).unwrap();

        let mut store = FileStore::new(&path);
        store.write(STORAGE_KEY, Preference::Dark).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let values: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(values["wallet"], "connected");
        assert_eq!(values["theme"], "dark");
    }

    #[test]
    fn test_file_store_preserves_non_string_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"wallet": "connected", "volume": 3, "recent": [1, 2]}"#).unwrap();

        let mut store = FileStore::new(&path);
        store.write(STORAGE_KEY, Preference::Dark).unwrap();

        let values: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(values["wallet"], "connected");
        assert_eq!(values["volume"], 3);
        assert_eq!(values["recent"], serde_json::json!([1, 2]));
        assert_eq!(store.read(STORAGE_KEY).unwrap(), Some(Preference::Dark));
    }

    #[test]
    fn test_file_store_non_string_preference_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme": 1}"#).unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.read(STORAGE_KEY),
            Err(StoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_file_store_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.read(STORAGE_KEY),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_file_store_write_replaces_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        store.write(STORAGE_KEY, Preference::System).unwrap();
        assert_eq!(store.read(STORAGE_KEY).unwrap(), Some(Preference::System));
        assert!(logs_contain("replacing unparsable preference file"));
    }
}
