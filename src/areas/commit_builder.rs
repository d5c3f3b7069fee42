use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, Result};

impl Repository {
    /// Record the working directory as a new commit on top of HEAD
    ///
    /// The commit is stamped with the current local time.
    pub fn commit_working_dir(&self, author: &str, message: &str) -> Result<ObjectId> {
        self.commit_with_author(Author::new(author), message)
    }

    /// Record the working directory as a new commit by `author`
    ///
    /// HEAD only moves once every object of the commit is stored, so a
    /// failure part-way leaves the previous history untouched.
    pub fn commit_with_author(&self, author: Author, message: &str) -> Result<ObjectId> {
        let tree_oid = self.store_working_tree()?;
        let parent = self.head()?;
        let message = message.trim().to_string();

        let commit = Commit::new(parent, tree_oid, author, message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        tracing::info!(
            commit = %commit_id,
            parent = ?commit.parent().map(ObjectId::to_short_oid),
            "recorded commit"
        );

        Ok(commit_id)
    }

    fn store_working_tree(&self) -> Result<ObjectId> {
        let files = self.workspace().list_files()?;

        let mut entries = Vec::with_capacity(files.len());
        for path in &files {
            let blob_oid = self.database().put(self.workspace().read_file(path)?)?;
            let mode = self.workspace().file_mode(path);

            entries.push((path.as_path(), DatabaseEntry::new(blob_oid, mode.into())));
        }

        let tree = Tree::build(entries).map_err(|e| {
            RepositoryError::storage(
                self.working_dir(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{e:#}")),
            )
        })?;

        // sub-trees come before the trees that reference them
        let mut store_tree = |tree: &Tree| -> anyhow::Result<()> {
            self.database().store(tree)?;
            Ok(())
        };
        tree.traverse(&mut store_tree).map_err(|e| {
            e.downcast::<RepositoryError>()
                .unwrap_or_else(|e| RepositoryError::corrupt("tree", format!("{e:#}")))
        })?;

        tree.object_id()
            .map_err(|e| RepositoryError::corrupt("tree", format!("{e:#}")))
    }
}
