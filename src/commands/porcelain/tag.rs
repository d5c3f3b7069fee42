use crate::areas::repository::Repository;
use crate::artifacts::tag::HEAD_REF_NAME;
use crate::artifacts::tag::commit_ref::CommitRef;
use crate::artifacts::tag::tag_name::TagName;
use crate::commands::Console;
use std::io::Write;
use std::path::Path;

/// Tag the commit `target` names, HEAD when omitted
pub fn create_tag(
    console: &mut Console<'_>,
    working_dir: &Path,
    name: &str,
    target: Option<&str>,
) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;

    TagName::try_parse(name)?;
    let target = CommitRef::try_parse(target.unwrap_or(HEAD_REF_NAME))?;
    let commit_id = repository.add_tag(name, target)?;

    writeln!(console.out, "Tag \"{name}\" created for commit {commit_id}")?;

    Ok(())
}

pub fn list_tags(console: &mut Console<'_>, working_dir: &Path) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;
    let tags = repository.list_tags()?;

    if tags.is_empty() {
        writeln!(console.out, "No tags found")?;
        return Ok(());
    }

    writeln!(console.out, "Tags:")?;
    for (name, commit_id) in tags {
        writeln!(console.out, "  {name}: {commit_id}")?;
    }

    Ok(())
}

pub fn delete_tag(console: &mut Console<'_>, working_dir: &Path, name: &str) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;
    let former_target = repository
        .delete_tag(name)?
        .map(|commit_id| commit_id.to_short_oid())
        .unwrap_or_else(|| "unavailable".to_string());

    writeln!(console.out, "Tag \"{name}\" deleted (was {former_target})")?;

    Ok(())
}
