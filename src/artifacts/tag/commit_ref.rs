use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::tag::tag_name::TagName;
use crate::artifacts::tag::{HEAD_REF_NAME, REF_ALIASES};
use crate::errors::{RepositoryError, Result};

/// A reference that resolves through the reference store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicRef {
    /// The commit HEAD currently designates
    Head,
    /// The commit an existing tag points at
    Tag(TagName),
}

/// A user-supplied way of naming a commit
///
/// Supports:
/// - Full commit IDs: 40-character hexadecimal strings
/// - `HEAD` and its alias `@`
/// - Names of existing tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRef {
    Literal(ObjectId),
    Symbolic(SymbolicRef),
}

impl CommitRef {
    /// Parse a commit reference
    ///
    /// Anything that is neither a commit ID, `HEAD` nor a valid tag name is
    /// rejected as an invalid reference.
    pub fn try_parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let reference = REF_ALIASES.get(reference).copied().unwrap_or(reference);

        if reference == HEAD_REF_NAME {
            return Ok(CommitRef::Symbolic(SymbolicRef::Head));
        }

        if ObjectId::is_full_hex(reference) {
            let oid = ObjectId::try_parse(reference.to_string()).map_err(|_| {
                RepositoryError::InvalidReference {
                    reference: reference.to_string(),
                }
            })?;
            return Ok(CommitRef::Literal(oid));
        }

        TagName::try_parse(reference)
            .map(|name| CommitRef::Symbolic(SymbolicRef::Tag(name)))
            .map_err(|_| RepositoryError::InvalidReference {
                reference: reference.to_string(),
            })
    }

    /// Resolve to the ID of a commit stored in the repository
    pub fn resolve(&self, repository: &Repository) -> Result<ObjectId> {
        let oid = match self {
            CommitRef::Literal(oid) => Some(oid.clone()),
            CommitRef::Symbolic(SymbolicRef::Head) => repository.refs().read_head()?,
            CommitRef::Symbolic(SymbolicRef::Tag(name)) => repository.refs().find_tag(name)?,
        };

        let oid = oid.ok_or_else(|| self.invalid())?;

        match repository.database().object_type(&oid) {
            Ok(ObjectType::Commit) => Ok(oid),
            Ok(_) | Err(RepositoryError::ObjectNotFound { .. }) => Err(self.invalid()),
            Err(e) => Err(e),
        }
    }

    fn invalid(&self) -> RepositoryError {
        RepositoryError::InvalidReference {
            reference: self.to_string(),
        }
    }
}

impl From<ObjectId> for CommitRef {
    fn from(oid: ObjectId) -> Self {
        CommitRef::Literal(oid)
    }
}

impl From<&ObjectId> for CommitRef {
    fn from(oid: &ObjectId) -> Self {
        CommitRef::Literal(oid.clone())
    }
}

impl From<SymbolicRef> for CommitRef {
    fn from(reference: SymbolicRef) -> Self {
        CommitRef::Symbolic(reference)
    }
}

impl std::str::FromStr for CommitRef {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitRef::Literal(oid) => write!(f, "{oid}"),
            CommitRef::Symbolic(SymbolicRef::Head) => write!(f, "{HEAD_REF_NAME}"),
            CommitRef::Symbolic(SymbolicRef::Tag(name)) => write!(f, "{name}"),
        }
    }
}
