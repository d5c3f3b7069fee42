//! caf: a content-addressed file snapshot store
//!
//! Working directories are recorded as immutable commits of blobs and trees
//! in a local object database; tags give commits human-readable names.
//!
//! - `areas`: storage, object database, references and the repository facade
//! - `artifacts`: object model, tag names and commit references
//! - `commands`: implementations behind the `caf` binary
//! - `errors`: the repository error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
