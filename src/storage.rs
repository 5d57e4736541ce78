//! String key-value persistence.
//!
//! The session stores a handful of string values (theme, tab, serialized
//! history). [`FileStorage`] keeps them in one JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Key for the selected theme.
pub const THEME_KEY: &str = "mintCalcTheme";
/// Key for the selected tab.
pub const ACTIVE_TAB_KEY: &str = "mintCalcActiveTab";
/// Key for the serialized history array.
pub const HISTORY_KEY: &str = "mintCalcHistory";

/// A string-valued key-value store.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage, lost on exit.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON file, rewritten on every change.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Default location: `<data dir>/mintcalc/storage.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mintcalc")
            .join("storage.json")
    }

    /// Open the store at `path`.
    ///
    /// A missing or empty file is an empty store. A file that is not a JSON
    /// object of strings is moved aside to `storage.json.bak` and the store
    /// starts empty. Only I/O failures are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&content) {
                    Ok(values) => values,
                    Err(e) => {
                        let backup = Self::backup_path(&path);
                        tracing::warn!(
                            path = %path.display(),
                            backup = %backup.display(),
                            error = %e,
                            "Corrupt storage file, starting empty"
                        );
                        fs::rename(&path, &backup)?;
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened storage");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file at `path` is kept.
    pub fn backup_path(path: &Path) -> PathBuf {
        path.with_extension("json.bak")
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.values)?;

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;

        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new().with(THEME_KEY, "dark");
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get(HISTORY_KEY).unwrap(), None);

        storage.set(HISTORY_KEY, "[]").unwrap();
        assert_eq!(storage.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(ACTIVE_TAB_KEY).unwrap(), None);
        storage.set(ACTIVE_TAB_KEY, "Health Tools").unwrap();
        assert!(path.exists());

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(ACTIVE_TAB_KEY).unwrap().as_deref(),
            Some("Health Tools")
        );
    }

    #[test]
    fn test_file_storage_recovers_from_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        for garbage in ["not json", "{\"mintCalcTheme\": \"da", "{\"mintCalcTheme\": 1}"] {
            fs::write(&path, garbage).unwrap();

            let mut storage = FileStorage::open(&path).unwrap();
            assert_eq!(storage.get(THEME_KEY).unwrap(), None);
            let backup = FileStorage::backup_path(&path);
            assert_eq!(fs::read_to_string(&backup).unwrap(), garbage);
            assert!(!path.exists());

            storage.set(THEME_KEY, "dark").unwrap();
            let reopened = FileStorage::open(&path).unwrap();
            assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
            fs::remove_file(&path).unwrap();
        }
    }

    #[test]
    fn test_file_storage_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "  \n").unwrap();
        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(HISTORY_KEY).unwrap(), None);
        assert!(!FileStorage::backup_path(&path).exists());
    }
}
