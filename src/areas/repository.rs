//! Repository facade
//!
//! Owns the on-disk layout of a repository and wires the object database,
//! the reference store and the working directory together. It is the only
//! component that advances HEAD.
//!
//! ## Layout
//!
//! ```text
//! <working dir>/.caf/
//!     HEAD                    latest commit ID, empty before the first commit
//!     objects/ab/cdef...      zlib-compressed objects
//!     refs/tags/<name>        tag target commit ID
//!     store.lock              advisory lock for create/delete
//! ```

use crate::areas::database::{Database, OBJECTS_PREFIX};
use crate::areas::refs::{Refs, TAGS_PREFIX};
use crate::areas::storage::{EntryStore, FileStore};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::tag::commit_ref::CommitRef;
use crate::artifacts::tag::tag_name::TagName;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the metadata directory inside the working directory
pub const METADATA_DIR: &str = ".caf";

#[derive(Debug)]
pub struct Repository {
    working_dir: Box<Path>,
    database: Database,
    refs: Refs,
    workspace: Workspace,
}

impl Repository {
    /// Create the repository layout below `working_dir` and open it
    ///
    /// Initializing an existing repository leaves its content untouched.
    pub fn init(working_dir: impl AsRef<Path>) -> Result<Self> {
        let working_dir = working_dir.as_ref();
        std::fs::create_dir_all(working_dir)
            .map_err(|e| RepositoryError::storage(working_dir, e))?;

        let metadata_dir = working_dir.join(METADATA_DIR);
        for area in [OBJECTS_PREFIX, TAGS_PREFIX] {
            let area_dir = metadata_dir.join(area);
            std::fs::create_dir_all(&area_dir)
                .map_err(|e| RepositoryError::storage(&area_dir, e))?;
        }

        let repository = Self::open(working_dir)?;
        if repository.refs.init_head()? {
            tracing::info!(path = %repository.working_dir.display(), "initialized repository");
        }

        Ok(repository)
    }

    /// Open the repository rooted at `working_dir`
    ///
    /// Fails with `NoRepositoryFound` when there is no metadata directory.
    pub fn open(working_dir: impl AsRef<Path>) -> Result<Self> {
        let working_dir = working_dir.as_ref();

        if !Self::is_repository(working_dir) {
            return Err(RepositoryError::NoRepositoryFound {
                path: working_dir.to_path_buf(),
            });
        }

        let working_dir = working_dir
            .canonicalize()
            .map_err(|e| RepositoryError::storage(working_dir, e))?;
        let store = FileStore::new(working_dir.join(METADATA_DIR).into_boxed_path());

        Ok(Self::with_store(working_dir, Arc::new(store)))
    }

    /// Bind a working directory to an arbitrary entry store
    pub fn with_store(working_dir: impl Into<PathBuf>, store: Arc<dyn EntryStore>) -> Self {
        let working_dir = working_dir.into().into_boxed_path();

        Repository {
            database: Database::new(store.clone()),
            refs: Refs::new(store),
            workspace: Workspace::new(working_dir.clone()),
            working_dir,
        }
    }

    pub fn is_repository(working_dir: impl AsRef<Path>) -> bool {
        working_dir.as_ref().join(METADATA_DIR).is_dir()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The latest commit, `None` before the first commit
    pub fn head(&self) -> Result<Option<ObjectId>> {
        self.refs.read_head()
    }

    pub fn resolve(&self, reference: &CommitRef) -> Result<ObjectId> {
        reference.resolve(self)
    }

    pub fn read_commit(&self, commit_id: &ObjectId) -> Result<Commit> {
        self.database.parse_object_as_commit(commit_id)
    }

    /// Commits reachable from HEAD, newest first
    pub fn log(&self) -> Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();
        let mut next = self.head()?;

        while let Some(commit_id) = next {
            let commit = self.read_commit(&commit_id)?;
            next = commit.parent().cloned();
            commits.push((commit_id, commit));
        }

        Ok(commits)
    }

    /// Materialize the files recorded by a commit, keyed by relative path
    pub fn read_snapshot(&self, commit_id: &ObjectId) -> Result<BTreeMap<PathBuf, Bytes>> {
        let commit = self.read_commit(commit_id)?;
        let mut files = BTreeMap::new();

        self.collect_tree(commit.tree_oid(), Path::new(""), &mut files)?;

        Ok(files)
    }

    fn collect_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        files: &mut BTreeMap<PathBuf, Bytes>,
    ) -> Result<()> {
        let tree = self.database.parse_object_as_tree(tree_oid)?;
        let entries = tree
            .entries()
            .map_err(|e| RepositoryError::corrupt(tree_oid, format!("{e:#}")))?;

        for (name, entry) in entries {
            let path = prefix.join(name);

            if entry.is_tree() {
                self.collect_tree(&entry.oid, &path, files)?;
            } else {
                let blob = self.database.parse_object_as_blob(&entry.oid)?;
                files.insert(path, blob.into_content());
            }
        }

        Ok(())
    }

    /// Tag the commit `target` resolves to
    ///
    /// Returns the ID of the tagged commit.
    pub fn add_tag(&self, name: &str, target: impl Into<CommitRef>) -> Result<ObjectId> {
        let name = TagName::try_parse(name)?;
        let commit_id = self.resolve(&target.into())?;

        self.refs.create_tag(&name, &commit_id)?;
        tracing::info!(tag = %name, commit = %commit_id, "created tag");

        Ok(commit_id)
    }

    /// Whether a tag exists; lookup failures count as absent
    pub fn tag_exists(&self, name: &str) -> bool {
        TagName::try_parse(name)
            .and_then(|name| self.refs.tag_exists(&name))
            .unwrap_or(false)
    }

    /// Remove a tag and return the commit it pointed at
    ///
    /// The target is `None` when the tag entry was unreadable.
    pub fn delete_tag(&self, name: &str) -> Result<Option<ObjectId>> {
        let name = Self::existing_tag_name(name)?;
        let commit_id = self.refs.delete_tag(&name)?;
        tracing::info!(
            tag = %name,
            commit = ?commit_id.as_ref().map(ObjectId::to_short_oid),
            "deleted tag"
        );

        Ok(commit_id)
    }

    pub fn list_tags(&self) -> Result<Vec<(TagName, ObjectId)>> {
        self.refs.list_tags()
    }

    pub fn read_tag(&self, name: &str) -> Result<ObjectId> {
        self.refs.read_tag(&Self::existing_tag_name(name)?)
    }

    // a name that cannot be created cannot be found either
    fn existing_tag_name(name: &str) -> Result<TagName> {
        TagName::try_parse(name).map_err(|_| RepositoryError::TagNotFound {
            name: name.to_string(),
        })
    }
}
