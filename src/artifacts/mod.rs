//! Data structures of the store
//!
//! - `database`: Tree entry records
//! - `objects`: Object types (blob, tree, commit) and their encoding
//! - `tag`: Tag names and commit references

pub mod database;
pub mod objects;
pub mod tag;
