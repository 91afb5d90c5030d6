//! Persisted user preferences
//!
//! A small key-value store whose values are JSON-encoded strings. Unreadable
//! data never raises: a malformed value reads as absent, and a malformed
//! backing file reads as an empty store.
//!
//! ## Keys
//!
//! - `theme` - `"light"` or `"dark"`
//! - `lastSearch` - last query that produced results, or `""` after a reset

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const THEME_KEY: &str = "theme";
pub const LAST_SEARCH_KEY: &str = "lastSearch";

/// Color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw string storage underneath the preference store
pub trait KeyValueStorage: Send {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String) -> Result<()>;
}

/// Storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw (already encoded) value
    pub fn with_raw_item(mut self, key: &str, raw: &str) -> Self {
        self.items.insert(key.to_string(), raw.to_string());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the file at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = Self::read_items(&path);
        Self { path, items }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            debug!("No preference file at {}", path.display());
            return BTreeMap::new();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read preferences {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(
                "Ignoring malformed preference file {}: {}",
                path.display(),
                e
            );
            BTreeMap::new()
        })
    }

    fn write_items(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preference directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.items).context("Failed to serialize preferences")?;

        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        self.write_items()
    }
}

/// Typed access to persisted preferences
pub struct PreferenceStore {
    storage: Box<dyn KeyValueStorage>,
}

impl PreferenceStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Store backed by a JSON file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::open(path))
    }

    /// Store that is discarded on exit
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Read and decode a value; absent or malformed data yields `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Treating malformed preference '{}' as absent: {}", key, e);
                None
            }
        }
    }

    /// Encode and store a value
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to encode preference '{key}'"))?;
        self.storage.set_item(key, raw)
    }

    /// Stored theme, light when unset
    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY).unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, &theme)
    }

    /// Stored last search, empty when unset
    pub fn last_search(&self) -> String {
        self.get(LAST_SEARCH_KEY).unwrap_or_default()
    }

    pub fn set_last_search(&mut self, query: &str) -> Result<()> {
        self.set(LAST_SEARCH_KEY, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.last_search(), "");
        assert_eq!(store.get::<String>("missing"), None);
    }

    #[test]
    fn test_values_are_json_encoded() {
        let mut store = PreferenceStore::in_memory();
        store.set_theme(Theme::Dark).unwrap();
        store.set_last_search("pikachu").unwrap();

        assert_eq!(store.storage.get_item(THEME_KEY).as_deref(), Some("\"dark\""));
        assert_eq!(
            store.storage.get_item(LAST_SEARCH_KEY).as_deref(),
            Some("\"pikachu\"")
        );
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.last_search(), "pikachu");
    }

    #[test]
    fn test_malformed_value_reads_as_absent() {
        let storage = MemoryStorage::new()
            .with_raw_item(THEME_KEY, "{not json")
            .with_raw_item(LAST_SEARCH_KEY, "42");
        let store = PreferenceStore::new(storage);

        assert_eq!(store.get::<Theme>(THEME_KEY), None);
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.last_search(), "");
    }

    #[test]
    fn test_unknown_theme_reads_as_light() {
        let storage = MemoryStorage::new().with_raw_item(THEME_KEY, "\"purple\"");
        assert_eq!(PreferenceStore::new(storage).theme(), Theme::Light);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("preferences.json");

        {
            let mut store = PreferenceStore::file(&path);
            store.set_theme(Theme::Dark).unwrap();
            store.set_last_search("char").unwrap();
        }

        let store = PreferenceStore::file(&path);
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.last_search(), "char");
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "not a json object").unwrap();

        let mut store = PreferenceStore::file(&path);
        assert_eq!(store.theme(), Theme::Light);

        // Writing replaces the broken file with a valid one
        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(PreferenceStore::file(&path).theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
