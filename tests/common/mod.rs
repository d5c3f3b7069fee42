#![allow(dead_code)]

pub mod command;
pub mod file;

/// Author name every test commit is recorded with
pub const AUTHOR_NAME: &str = "fake_user";
/// Timestamp every test commit is recorded with (%Y-%m-%d %H:%M:%S %z)
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

/// Read the commit ID HEAD points at, empty before the first commit
pub fn read_head(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".caf").join("HEAD"))
        .unwrap_or_else(|e| panic!("Failed to read HEAD in {:?}: {}", dir, e))
        .trim()
        .to_string()
}
