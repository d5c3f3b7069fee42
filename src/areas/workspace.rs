use crate::artifacts::objects::entry_mode::FileMode;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Top-level entries never recorded in a snapshot
const IGNORED_PATHS: [&str; 1] = [crate::areas::repository::METADATA_DIR];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Every regular file below the working directory, relative and sorted
    ///
    /// Directories only appear through the files they contain. Symbolic links
    /// are not followed and not recorded.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.path.to_path_buf());
                RepositoryError::storage(path, e.into())
            })?;

            if entry.file_type().is_symlink() {
                tracing::warn!(path = %entry.path().display(), "skipping symbolic link");
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(self.path.as_ref()) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    // only the repository's own metadata directory; nested ones are user data
    fn is_ignored(entry: &walkdir::DirEntry) -> bool {
        entry.depth() == 1
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| IGNORED_PATHS.contains(&name))
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let file_path = self.path.join(file_path);

        std::fs::read(&file_path)
            .map(Bytes::from)
            .map_err(|e| RepositoryError::storage(file_path, e))
    }

    pub fn file_mode(&self, file_path: &Path) -> FileMode {
        FileMode::of(&self.path.join(file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[rstest]
    fn files_are_listed_relative_and_sorted(dir: TempDir) {
        dir.child("b.txt").write_str("b").unwrap();
        dir.child("a/nested/deep.txt").write_str("deep").unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("empty").create_dir_all().unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(
            workspace.list_files().unwrap(),
            vec![
                PathBuf::from("a/nested/deep.txt"),
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
            ]
        );
    }

    #[rstest]
    fn metadata_directory_is_never_listed(dir: TempDir) {
        dir.child(".caf/HEAD").write_str("").unwrap();
        dir.child("kept.txt").write_str("kept").unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(workspace.list_files().unwrap(), vec![PathBuf::from("kept.txt")]);
    }

    #[rstest]
    fn nested_metadata_named_directories_are_recorded(dir: TempDir) {
        dir.child(".caf/HEAD").write_str("").unwrap();
        dir.child("sub/.caf/notes.txt").write_str("x").unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(
            workspace.list_files().unwrap(),
            vec![PathBuf::from("sub/.caf/notes.txt")]
        );
    }

    #[cfg(unix)]
    #[rstest]
    fn symbolic_links_are_skipped(dir: TempDir) {
        dir.child("target.txt").write_str("target").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), dir.path().join("link.txt"))
            .unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(workspace.list_files().unwrap(), vec![PathBuf::from("target.txt")]);
    }

    #[rstest]
    fn reading_a_missing_file_is_a_storage_failure(dir: TempDir) {
        let workspace = Workspace::new(dir.path().into());

        assert!(matches!(
            workspace.read_file(Path::new("missing.txt")),
            Err(RepositoryError::Storage { .. })
        ));
    }
}
