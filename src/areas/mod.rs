//! Core repository components
//!
//! - `storage`: Key/value entry stores (filesystem and in-memory)
//! - `database`: Content-addressed object database for blobs, trees, and commits
//! - `refs`: HEAD and the tag namespace
//! - `workspace`: Working directory file system access
//! - `repository`: The facade tying the components together
//! - `commit_builder`: Recording the working directory as a commit

mod commit_builder;
pub mod database;
pub mod refs;
pub mod repository;
pub mod storage;
pub mod workspace;
