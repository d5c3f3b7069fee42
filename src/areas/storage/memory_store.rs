use crate::areas::storage::EntryStore;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Entry store kept entirely in memory.
///
/// Data is lost when the store is dropped. Used to exercise the engine
/// without touching the file system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(key: &str, reason: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::storage(key, std::io::Error::other(format!("lock poisoned: {reason}")))
    }
}

impl EntryStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Bytes>> {
        let entries = self.entries.read().map_err(|e| Self::poisoned(key, e))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(|e| Self::poisoned(key, e))?;
        entries.insert(key.to_string(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn create(&self, key: &str, data: &[u8]) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|e| Self::poisoned(key, e))?;

        if entries.contains_key(key) {
            return Ok(false);
        }

        entries.insert(key.to_string(), Bytes::copy_from_slice(data));
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|e| Self::poisoned(key, e))?;
        Ok(entries.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().map_err(|e| Self::poisoned(key, e))?;
        Ok(entries.contains_key(key))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|e| Self::poisoned(prefix, e))?;
        let dir_prefix = format!("{}/", prefix.trim_end_matches('/'));

        // BTreeMap iteration is already in key order
        Ok(entries
            .keys()
            .filter(|key| prefix.is_empty() || key.starts_with(&dir_prefix))
            .cloned()
            .collect())
    }
}
