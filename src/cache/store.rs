//! File-backed key-value store for cached API data
//!
//! Stores one JSON document per key in an XDG-compliant cache directory.
//! Values are replaced wholesale on every write; a document that no longer
//! parses is treated the same as a missing one.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;

/// Reads and writes serialized values keyed by name.
///
/// Keys map to JSON files in the cache directory (`~/.cache/unirate/` on
/// Linux, or the platform equivalent). The store never interprets the values
/// it holds beyond serializing them.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at the XDG-compliant cache directory.
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "unirate")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a store rooted at a custom directory.
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path of the file backing the given key
    fn key_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Serializes `value` under `key`, replacing whatever the key held before.
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the entry (e.g., "universities")
    /// * `value` - The value to persist (must implement Serialize)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> std::io::Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.key_path(key), json)
    }

    /// Reads the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or the stored document cannot
    /// be parsed as `T`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let content = fs::read_to_string(self.key_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }
}
