use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::tag::commit_ref::CommitRef;
use crate::commands::Console;
use std::io::Write;
use std::path::Path;

/// Print the decoded content of an object
///
/// Full object IDs may name any kind of object; anything else is resolved
/// as a commit reference.
pub fn cat_file(console: &mut Console<'_>, working_dir: &Path, object: &str) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;

    let object_id = if ObjectId::is_full_hex(object.trim()) {
        ObjectId::try_parse(object.trim().to_string())?
    } else {
        repository.resolve(&CommitRef::try_parse(object)?)?
    };

    match repository.database().parse_object(&object_id)? {
        ObjectBox::Blob(blob) => console.out.write_all(blob.content())?,
        object => writeln!(console.out, "{}", object.display())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::run;
    use crate::commands::{FAILURE, SUCCESS};
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn sample_repository() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        dir.child("sample.txt").write_str("sample content").unwrap();
        let repository = Repository::init(dir.path()).unwrap();
        repository.commit_working_dir("Tester", "Message").unwrap();

        (dir, repository)
    }

    #[test]
    fn blobs_are_printed_verbatim() {
        let (dir, repository) = sample_repository();
        let blob_id = repository.database().put(&b"sample content"[..]).unwrap();

        let outcome = run(|console| cat_file(console, dir.path(), blob_id.as_ref()));

        assert_eq!(outcome.status, SUCCESS);
        assert_eq!(outcome.stdout, "sample content");
    }

    #[test]
    fn head_prints_the_commit_body() {
        let (dir, repository) = sample_repository();
        let head = repository.head().unwrap().unwrap();
        let commit = repository.read_commit(&head).unwrap();

        let outcome = run(|console| cat_file(console, dir.path(), "HEAD"));

        assert_eq!(outcome.status, SUCCESS);
        assert!(
            outcome
                .stdout
                .starts_with(&format!("tree {}\nauthor Tester ", commit.tree_oid()))
        );
        assert!(outcome.stdout.ends_with("\n\nMessage\n"));
    }

    #[test]
    fn trees_list_their_entries() {
        let (dir, repository) = sample_repository();
        let head = repository.head().unwrap().unwrap();
        let tree_oid = repository.read_commit(&head).unwrap().tree_oid().clone();
        let blob_id = repository.database().put(&b"sample content"[..]).unwrap();

        let outcome = run(|console| cat_file(console, dir.path(), tree_oid.as_ref()));

        assert_eq!(outcome.stdout, format!("100644 blob {blob_id}\tsample.txt\n"));
    }

    #[test]
    fn unknown_objects_are_reported() {
        let (dir, _repository) = sample_repository();

        let outcome = run(|console| {
            cat_file(console, dir.path(), "0123456789abcdef0123456789abcdef01234567")
        });

        assert_eq!(outcome.status, FAILURE);
        assert!(outcome.stderr.starts_with("Repository error: object "));
    }
}
