use crate::areas::repository::Repository;
use crate::commands::Console;
use std::io::Write;
use std::path::Path;

pub fn init(console: &mut Console<'_>, working_dir: &Path) -> anyhow::Result<()> {
    let existed = Repository::is_repository(working_dir);
    let repository = Repository::init(working_dir)?;

    let action = if existed {
        "Reinitialized existing"
    } else {
        "Initialized empty"
    };
    writeln!(
        console.out,
        "{action} caf repository in {}",
        repository.working_dir().display()
    )?;

    Ok(())
}
