//! Key/value persistence for repository entries
//!
//! Everything the engine persists (objects, tags and HEAD) is an entry
//! addressed by a `/`-separated key relative to the repository metadata
//! directory, e.g. `HEAD`, `refs/tags/v1.0` or `objects/ab/cdef...`.
//!
//! Each entry is written independently, so publishing or removing one entry
//! never rewrites another one.

use crate::errors::Result;
use bytes::Bytes;

mod file_store;
mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Prefix used for in-flight writes; such entries are never listed.
///
/// Keys never contain a component starting with `.`, so temporary files
/// cannot shadow a real entry.
pub const TEMP_ENTRY_PREFIX: &str = ".tmp-";

pub trait EntryStore: std::fmt::Debug + Send + Sync {
    /// Read an entry, `None` if it does not exist.
    fn read(&self, key: &str) -> Result<Option<Bytes>>;

    /// Atomically publish `data` under `key`, replacing any previous value.
    fn write(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Atomically publish `data` under `key` unless the key already exists.
    ///
    /// Returns `false` (and writes nothing) when the key was already present.
    fn create(&self, key: &str, data: &[u8]) -> Result<bool>;

    /// Remove an entry. Returns `false` when there was nothing to remove.
    fn delete(&self, key: &str) -> Result<bool>;

    fn contains(&self, key: &str) -> Result<bool>;

    /// List every key below `prefix`, sorted by byte order.
    ///
    /// A prefix with no entries lists as empty.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

pub(crate) fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
