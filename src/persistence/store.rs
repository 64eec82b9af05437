//! Storage collaborator implementations

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ArcadeError;

/// Get/set storage for opaque string values
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ArcadeError>;
    fn remove(&mut self, key: &str) -> Result<(), ArcadeError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ArcadeError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ArcadeError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object file
///
/// The whole map is rewritten through a temp file on every `set`, then
/// renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArcadeError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Store {} is corrupt ({}), starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), ArcadeError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ArcadeError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), ArcadeError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_file_store_persists_between_opens() {
        let path = std::env::temp_dir().join(format!(
            "arcade_hub_store_test_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set("arcadehub_playerName", "neo_1").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("arcadehub_playerName").as_deref(), Some("neo_1"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_store_recovers_from_corruption() {
        let path = std::env::temp_dir().join(format!(
            "arcade_hub_store_corrupt_{}.json",
            std::process::id()
        ));
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
        let _ = fs::remove_file(&path);
    }
}
