//! Command implementations behind the `caf` binary
//!
//! Commands are organized into two categories:
//!
//! - `plumbing`: Low-level object inspection (cat-file, ls-tree)
//! - `porcelain`: User-facing workflows (init, commit, log, tags)
//!
//! Every command writes its normal output to the console's `out` stream and
//! reports failures through [`execute`], which turns them into a status code.

use crate::errors::RepositoryError;
use std::io::Write;

pub mod plumbing;
pub mod porcelain;

/// Status returned by a command that completed
pub const SUCCESS: i32 = 0;
/// Status returned by a command that failed
pub const FAILURE: i32 = -1;

/// Output streams handed to a command
pub struct Console<'w> {
    pub out: &'w mut dyn Write,
    pub err: &'w mut dyn Write,
}

impl<'w> Console<'w> {
    pub fn new(out: &'w mut dyn Write, err: &'w mut dyn Write) -> Self {
        Console { out, err }
    }
}

/// Run a command and translate its outcome into a status code
///
/// Repository errors are reported on the error stream; a missing repository
/// gets its own message.
pub fn execute<F>(console: &mut Console<'_>, command: F) -> i32
where
    F: FnOnce(&mut Console<'_>) -> anyhow::Result<()>,
{
    match command(console) {
        Ok(()) => SUCCESS,
        Err(error) => {
            let message = match error.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::NoRepositoryFound { path }) => {
                    format!("No repository found at {}", path.display())
                }
                Some(repository_error) => format!("Repository error: {repository_error}"),
                None => format!("Error: {error:#}"),
            };

            // nothing sensible is left to do if stderr is gone
            let _ = writeln!(console.err, "{message}");
            FAILURE
        }
    }
}
