use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::tag::HEAD_REF_NAME;
use crate::artifacts::tag::commit_ref::CommitRef;
use crate::commands::Console;
use crate::errors::RepositoryError;
use std::io::Write;
use std::path::Path;

/// List every file recorded by a commit, HEAD when omitted
pub fn ls_tree(
    console: &mut Console<'_>,
    working_dir: &Path,
    reference: Option<&str>,
) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;

    let commit_ref = CommitRef::try_parse(reference.unwrap_or(HEAD_REF_NAME))?;
    let commit_id = repository.resolve(&commit_ref)?;
    let commit = repository.read_commit(&commit_id)?;

    print_tree(&repository, console.out, commit.tree_oid(), Path::new(""))
}

fn print_tree(
    repository: &Repository,
    writer: &mut dyn Write,
    tree_oid: &ObjectId,
    prefix: &Path,
) -> anyhow::Result<()> {
    let tree = repository.database().parse_object_as_tree(tree_oid)?;
    let entries = tree
        .entries()
        .map_err(|e| RepositoryError::corrupt(tree_oid, format!("{e:#}")))?;

    for (name, entry) in entries {
        let path = prefix.join(name);

        if entry.is_tree() {
            print_tree(repository, writer, &entry.oid, &path)?;
        } else {
            writeln!(
                writer,
                "{} {} {}\t{}",
                entry.mode,
                ObjectType::Blob,
                entry.oid,
                path.display()
            )?;
        }
    }

    Ok(())
}
