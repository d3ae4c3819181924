use anyhow::{Context, Result};
use fox_hunt_core::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key-value store persisted as a flat JSON object.
///
/// Every write rewrites the whole file so the state survives the process.
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let values: BTreeMap<String, String> = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read state file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("State file {} is not a JSON object", path.display()))?
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened state file {} ({} keys)", path.display(), values.len());

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn flush(&self) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::Backend(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fox-hunt-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("targetLat").unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");

        let mut store = FileStore::open(&path).unwrap();
        store.set("targetLat", "40.001").unwrap();
        store.set("targetLon", "-75.002").unwrap();
        store.remove("targetLon").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("targetLat").unwrap().as_deref(), Some("40.001"));
        assert_eq!(reopened.get("targetLon").unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_malformed_file() {
        let path = temp_path("malformed");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(FileStore::open(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
