//! References (HEAD and tags)
//!
//! References are human-readable names pointing at commits:
//!
//! - HEAD: the latest commit, advanced by every new commit
//! - Tags: `refs/tags/*`, one entry per tag
//!
//! ## File Format
//!
//! Every reference entry holds a 40-character commit ID. HEAD is empty until
//! the first commit is recorded.

use crate::areas::storage::{EntryStore, join_key};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::tag::HEAD_REF_NAME;
use crate::artifacts::tag::tag_name::TagName;
use crate::errors::{RepositoryError, Result};
use std::sync::Arc;

/// Key prefix of the tag namespace
pub const TAGS_PREFIX: &str = "refs/tags";

#[derive(Debug, Clone)]
pub struct Refs {
    store: Arc<dyn EntryStore>,
}

impl Refs {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Refs { store }
    }

    fn tag_key(name: &TagName) -> String {
        join_key(TAGS_PREFIX, name.as_ref())
    }

    fn parse_target(name: &str, content: &[u8]) -> Result<Option<ObjectId>> {
        let content = std::str::from_utf8(content)
            .map_err(|e| Self::corrupt(name, e))?
            .trim();

        if content.is_empty() {
            return Ok(None);
        }

        ObjectId::try_parse(content.to_string())
            .map(Some)
            .map_err(|e| Self::corrupt(name, e))
    }

    fn corrupt(name: &str, reason: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::CorruptReference {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    fn read_entry(&self, key: &str) -> Result<Option<ObjectId>> {
        match self.store.read(key)? {
            Some(content) => Self::parse_target(key, &content),
            None => Ok(None),
        }
    }

    /// Create an empty HEAD unless one exists already
    pub(crate) fn init_head(&self) -> Result<bool> {
        self.store.create(HEAD_REF_NAME, b"")
    }

    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        self.read_entry(HEAD_REF_NAME)
    }

    /// Point HEAD at `oid`
    ///
    /// Only the repository advances HEAD, after the commit object is stored.
    pub(crate) fn update_head(&self, oid: &ObjectId) -> Result<()> {
        self.store.write(HEAD_REF_NAME, oid.as_ref().as_bytes())
    }

    /// Target of a tag, `None` if there is no such tag
    pub fn find_tag(&self, name: &TagName) -> Result<Option<ObjectId>> {
        self.read_entry(&Self::tag_key(name))
    }

    pub fn read_tag(&self, name: &TagName) -> Result<ObjectId> {
        self.find_tag(name)?
            .ok_or_else(|| RepositoryError::TagNotFound {
                name: name.to_string(),
            })
    }

    pub fn tag_exists(&self, name: &TagName) -> Result<bool> {
        self.store.contains(&Self::tag_key(name))
    }

    /// Create a tag; fails if the name is already taken
    pub fn create_tag(&self, name: &TagName, target: &ObjectId) -> Result<()> {
        self.check_namespace_conflicts(name)?;

        if !self
            .store
            .create(&Self::tag_key(name), target.as_ref().as_bytes())?
        {
            return Err(RepositoryError::DuplicateTag {
                name: name.to_string(),
            });
        }

        Ok(())
    }

    /// Remove a tag and return the commit it pointed at
    ///
    /// A tag whose entry cannot be parsed is still removed; its former
    /// target is then `None`.
    pub fn delete_tag(&self, name: &TagName) -> Result<Option<ObjectId>> {
        let tag_key = Self::tag_key(name);
        let not_found = || RepositoryError::TagNotFound {
            name: name.to_string(),
        };

        let content = self.store.read(&tag_key)?.ok_or_else(not_found)?;
        let target = match Self::parse_target(&tag_key, &content) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(tag = %name, error = %e, "deleting tag with unreadable target");
                None
            }
        };

        if !self.store.delete(&tag_key)? {
            return Err(not_found());
        }

        Ok(target)
    }

    /// Every tag with its target, ordered by name
    pub fn list_tags(&self) -> Result<Vec<(TagName, ObjectId)>> {
        let tag_prefix = format!("{TAGS_PREFIX}/");
        let mut tags = Vec::new();

        for key in self.store.list(TAGS_PREFIX)? {
            let Some(name) = key
                .strip_prefix(&tag_prefix)
                .and_then(|name| TagName::try_parse(name).ok())
            else {
                tracing::warn!(key = %key, "skipping entry with an invalid tag name");
                continue;
            };

            // the entry may disappear between listing and reading
            if let Some(target) = self.read_entry(&key)? {
                tags.push((name, target));
            }
        }
        tags.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(tags)
    }

    // `a` and `a/b` cannot both be tags: one would need to be a file and a
    // directory at the same time
    fn check_namespace_conflicts(&self, name: &TagName) -> Result<()> {
        let conflict = |other: &str| RepositoryError::InvalidTagName {
            name: name.to_string(),
            reason: format!("conflicts with existing tag {other}"),
        };

        let components = name.as_ref().split('/').collect::<Vec<_>>();
        for depth in 1..components.len() {
            let ancestor = components[..depth].join("/");
            if self.store.contains(&join_key(TAGS_PREFIX, &ancestor))? {
                return Err(conflict(ancestor.as_str()));
            }
        }

        let tag_prefix = format!("{TAGS_PREFIX}/");
        if let Some(descendant_key) = self.store.list(&Self::tag_key(name))?.first() {
            let descendant = descendant_key
                .strip_prefix(tag_prefix.as_str())
                .unwrap_or(descendant_key.as_str());
            return Err(conflict(descendant));
        }

        Ok(())
    }
}
