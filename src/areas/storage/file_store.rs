use crate::areas::storage::{EntryStore, TEMP_ENTRY_PREFIX};
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use derive_new::new;
use fake::rand;
use file_guard::Lock;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lock file guarding check-then-publish sequences across processes
pub const LOCK_FILE_NAME: &str = "store.lock";

/// Directories at or above this depth (e.g. `refs/tags`) are never pruned
const PRESERVED_DEPTH: usize = 2;

/// Entry store backed by one file per entry below a root directory.
#[derive(Debug, new)]
pub struct FileStore {
    root: Box<Path>,
}

impl FileStore {
    fn entry_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|component| !component.is_empty())
            .fold(self.root.to_path_buf(), |path, component| path.join(component))
    }

    fn entry_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.root.as_ref()).ok()?;
        let components = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;

        Some(components.join("/"))
    }

    fn generate_temp_name() -> String {
        format!("{TEMP_ENTRY_PREFIX}{}", rand::random::<u32>())
    }

    // hold the store lock for the duration of `action`
    fn exclusive<T>(&self, action: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_path = self.root.join(LOCK_FILE_NAME);
        let mut lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| RepositoryError::storage(&lock_path, e))?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Exclusive, 0, 1)
            .map_err(|e| RepositoryError::storage(&lock_path, e))?;

        action()
    }

    fn publish(&self, key: &str, data: &[u8]) -> Result<()> {
        let entry_path = self.entry_path(key);
        let entry_dir = entry_path
            .parent()
            .ok_or_else(|| {
                RepositoryError::storage(
                    &entry_path,
                    std::io::Error::other("entry has no parent directory"),
                )
            })?
            .to_path_buf();

        std::fs::create_dir_all(&entry_dir).map_err(|e| RepositoryError::storage(&entry_dir, e))?;

        // write next to the final entry, then rename it into place
        let temp_path = entry_dir.join(Self::generate_temp_name());
        let write_result = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .and_then(|mut file| {
                file.write_all(data)?;
                file.sync_all()
            });

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(RepositoryError::storage(&temp_path, e));
        }

        if let Err(e) = std::fs::rename(&temp_path, &entry_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(RepositoryError::storage(&entry_path, e));
        }

        tracing::debug!(key, bytes = data.len(), "published entry");

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.root.as_ref()
            && parent
                .strip_prefix(self.root.as_ref())
                .map(|relative| relative.components().count() > PRESERVED_DEPTH)
                .unwrap_or(false)
            && parent
                .read_dir()
                .map_err(|e| RepositoryError::storage(parent, e))?
                .next()
                .is_none()
        {
            std::fs::remove_dir(parent).map_err(|e| RepositoryError::storage(parent, e))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

impl EntryStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Bytes>> {
        let entry_path = self.entry_path(key);

        if !entry_path.is_file() {
            return Ok(None);
        }

        match std::fs::read(&entry_path) {
            Ok(content) => Ok(Some(content.into())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::storage(entry_path, e)),
        }
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        self.publish(key, data)
    }

    fn create(&self, key: &str, data: &[u8]) -> Result<bool> {
        self.exclusive(|| {
            if self.contains(key)? {
                return Ok(false);
            }

            self.publish(key, data)?;
            Ok(true)
        })
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.exclusive(|| {
            let entry_path = self.entry_path(key);

            if !entry_path.is_file() {
                return Ok(false);
            }

            std::fs::remove_file(&entry_path)
                .map_err(|e| RepositoryError::storage(&entry_path, e))?;
            self.prune_empty_parent_dirs(&entry_path)?;

            tracing::debug!(key, "removed entry");

            Ok(true)
        })
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entry_path(key).is_file())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix_path = self.entry_path(prefix);

        if !prefix_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&prefix_path).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| prefix_path.clone());
                RepositoryError::storage(path, e.into())
            })?;

            if !entry.file_type().is_file()
                || entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(TEMP_ENTRY_PREFIX)
            {
                continue;
            }

            if let Some(key) = self.entry_key(entry.path()) {
                keys.push(key);
            }
        }
        keys.sort();

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn file_store(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn write_then_read_returns_the_published_bytes(store_dir: TempDir) {
        let store = file_store(&store_dir);

        store.write("refs/tags/v1", b"abc").unwrap();

        assert_eq!(
            store.read("refs/tags/v1").unwrap(),
            Some(Bytes::from_static(b"abc"))
        );
        assert!(store_dir.path().join("refs").join("tags").join("v1").is_file());
    }

    #[rstest]
    fn create_refuses_to_overwrite_an_existing_entry(store_dir: TempDir) {
        let store = file_store(&store_dir);

        assert!(store.create("refs/tags/v1", b"first").unwrap());
        assert!(!store.create("refs/tags/v1", b"second").unwrap());

        assert_eq!(
            store.read("refs/tags/v1").unwrap(),
            Some(Bytes::from_static(b"first"))
        );
    }

    #[rstest]
    fn delete_prunes_emptied_directories_but_keeps_namespace_root(store_dir: TempDir) {
        let store = file_store(&store_dir);
        store.write("refs/tags/release/1.0", b"abc").unwrap();

        assert!(store.delete("refs/tags/release/1.0").unwrap());
        assert!(!store.delete("refs/tags/release/1.0").unwrap());

        assert!(!store_dir.path().join("refs/tags/release").exists());
        assert!(store_dir.path().join("refs/tags").is_dir());
    }

    #[rstest]
    fn list_is_sorted_and_skips_temporary_files(store_dir: TempDir) {
        let store = file_store(&store_dir);
        store.write("refs/tags/b", b"2").unwrap();
        store.write("refs/tags/a/c", b"3").unwrap();
        store.write("refs/tags/a", b"1").unwrap_err();
        std::fs::write(store_dir.path().join("refs/tags/.tmp-123"), b"partial").unwrap();

        assert_eq!(
            store.list("refs/tags").unwrap(),
            vec!["refs/tags/a/c".to_string(), "refs/tags/b".to_string()]
        );
        assert!(store.list("refs/heads").unwrap().is_empty());
    }

    #[rstest]
    fn entries_named_like_temporary_files_are_listed(store_dir: TempDir) {
        let store = file_store(&store_dir);
        store.write("refs/tags/tmp-nightly", b"1").unwrap();
        store.write("refs/tags/release/tmp-1", b"2").unwrap();

        assert_eq!(
            store.list("refs/tags").unwrap(),
            vec![
                "refs/tags/release/tmp-1".to_string(),
                "refs/tags/tmp-nightly".to_string()
            ]
        );
    }

    #[rstest]
    fn reading_a_missing_entry_is_not_an_error(store_dir: TempDir) {
        let store = file_store(&store_dir);

        assert_eq!(store.read("HEAD").unwrap(), None);
        assert!(!store.contains("HEAD").unwrap());
    }
}
