//! Tag names and commit references
//!
//! - `tag_name`: validated names for entries of the tag namespace
//! - `commit_ref`: parsed commit references (literal IDs, `HEAD`, tag names)

pub mod commit_ref;
pub mod tag_name;

pub const INVALID_TAG_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\/\/|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const HEAD_REF_NAME: &str = "HEAD";
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};
