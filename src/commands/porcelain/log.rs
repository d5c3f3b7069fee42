use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::Console;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub oneline: bool,
}

pub fn log(console: &mut Console<'_>, working_dir: &Path, opts: LogOptions) -> anyhow::Result<()> {
    let repository = Repository::open(working_dir)?;
    let commits = repository.log()?;

    if commits.is_empty() {
        writeln!(console.out, "No commits yet")?;
        return Ok(());
    }

    for (index, (commit_id, commit)) in commits.iter().enumerate() {
        if opts.oneline {
            show_commit_oneline(console.out, commit_id, commit)?;
        } else {
            // blank line between commits
            if index > 0 {
                writeln!(console.out)?;
            }
            show_commit_medium(console.out, commit_id, commit)?;
        }
    }

    Ok(())
}

fn show_commit_medium(
    writer: &mut dyn Write,
    commit_id: &ObjectId,
    commit: &Commit,
) -> anyhow::Result<()> {
    let header = format!("commit {commit_id}");
    writeln!(writer, "{}", header.as_str().yellow())?;
    writeln!(writer, "Author: {}", commit.author().name())?;
    writeln!(writer, "Date:   {}", commit.author().readable_timestamp())?;
    writeln!(writer)?;
    for message_line in commit.message().lines() {
        writeln!(writer, "    {message_line}")?;
    }

    Ok(())
}

fn show_commit_oneline(
    writer: &mut dyn Write,
    commit_id: &ObjectId,
    commit: &Commit,
) -> anyhow::Result<()> {
    let short_oid = commit_id.to_short_oid();
    writeln!(
        writer,
        "{} {}",
        short_oid.as_str().yellow(),
        commit.short_message()
    )?;

    Ok(())
}
