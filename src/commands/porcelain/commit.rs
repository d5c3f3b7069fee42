use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::commands::Console;
use std::io::Write;
use std::path::Path;

pub fn commit(
    console: &mut Console<'_>,
    working_dir: &Path,
    message: &str,
    author: Option<&str>,
) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;

    let author = Author::load_from_env(author)?;
    let is_root = match repository.head()? {
        Some(_) => "",
        None => "(root-commit) ",
    };

    let commit_id = repository.commit_with_author(author, message)?;
    let commit = repository.read_commit(&commit_id)?;

    writeln!(
        console.out,
        "[{}{}] {}",
        is_root,
        commit_id.to_short_oid(),
        commit.short_message()
    )?;

    Ok(())
}
