//! Tree entry records
//!
//! A database entry is what a tree stores per name: the ID of the referenced
//! object plus the mode it was recorded with.

pub mod database_entry;
