//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `commit`: Record the working directory as a new commit
//! - `log`: Show commit history
//! - `tag`: Create, list, or delete tags

pub mod commit;
pub mod init;
pub mod log;
pub mod tag;
