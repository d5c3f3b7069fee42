//! Repository error taxonomy
//!
//! Every failure the engine can report to its callers. The command layer maps
//! `NoRepositoryFound` onto its own message and every other kind onto a generic
//! repository error line.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no repository found at {}", path.display())]
    NoRepositoryFound { path: PathBuf },

    #[error("invalid reference: {reference} does not name a stored commit")]
    InvalidReference { reference: String },

    #[error("tag {name} already exists")]
    DuplicateTag { name: String },

    #[error("tag {name} not found")]
    TagNotFound { name: String },

    #[error("invalid tag name {name:?}: {reason}")]
    InvalidTagName { name: String, reason: String },

    #[error("object {oid} not found")]
    ObjectNotFound { oid: String },

    #[error("object {oid} is corrupt: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("reference {name} is corrupt: {reason}")]
    CorruptReference { name: String, reason: String },

    #[error("storage failure at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepositoryError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(oid: impl ToString, reason: impl ToString) -> Self {
        RepositoryError::CorruptObject {
            oid: oid.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_no_repository(&self) -> bool {
        matches!(self, RepositoryError::NoRepositoryFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
