//! Plumbing commands (low-level object inspection)
//!
//! Plumbing commands give direct access to the stored objects and are
//! primarily useful for scripting and debugging.
//!
//! ## Commands
//!
//! - `cat-file`: Print a decoded object
//! - `ls-tree`: List the files recorded by a commit

pub mod cat_file;
pub mod ls_tree;
