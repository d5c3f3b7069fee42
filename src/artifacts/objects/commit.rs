//! Commit object
//!
//! Commits represent snapshots of the working directory at specific points
//! in time. They contain:
//! - A tree object ID (directory snapshot)
//! - The parent commit ID, absent for the first commit
//! - Author name and timestamp
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, pack};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Environment variable naming the commit author
pub const AUTHOR_NAME_ENV: &str = "CAF_AUTHOR_NAME";
/// Environment variable pinning the commit timestamp
pub const AUTHOR_DATE_ENV: &str = "CAF_AUTHOR_DATE";

const FALLBACK_AUTHOR_NAME: &str = "caf";

/// Author name plus the moment the commit was recorded
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(name: &str) -> Self {
        Self::new_with_timestamp(name, chrono::Local::now().fixed_offset())
    }

    /// Create a new author with a specific timestamp
    ///
    /// Line breaks in the name are folded into spaces so the header stays on
    /// one line; sub-second precision is dropped since it is not serialized.
    pub fn new_with_timestamp(name: &str, timestamp: DateTime<FixedOffset>) -> Self {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let timestamp = DateTime::from_timestamp(timestamp.timestamp(), 0)
            .map(|utc| utc.with_timezone(timestamp.offset()))
            .unwrap_or(timestamp);

        Author { name, timestamp }
    }

    /// Resolve the author from an explicit name or the environment
    ///
    /// The name falls back to `CAF_AUTHOR_NAME`, then `USER`, then `caf`.
    /// `CAF_AUTHOR_DATE` pins the timestamp (RFC 2822 or
    /// `%Y-%m-%d %H:%M:%S %z`); otherwise the current time is used.
    pub fn load_from_env(name: Option<&str>) -> anyhow::Result<Self> {
        let name = match name {
            Some(name) => name.to_string(),
            None => std::env::var(AUTHOR_NAME_ENV)
                .or_else(|_| std::env::var("USER"))
                .unwrap_or_else(|_| FALLBACK_AUTHOR_NAME.to_string()),
        };

        match std::env::var(AUTHOR_DATE_ENV) {
            Ok(date_str) => {
                let timestamp = DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .with_context(|| format!("{AUTHOR_DATE_ENV} is not a valid date: {date_str}"))?;
                Ok(Author::new_with_timestamp(&name, timestamp))
            }
            Err(_) => Ok(Author::new(&name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Serialized form: "name timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Format timestamp in human-readable form
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn parse_offset(timezone: &str) -> anyhow::Result<FixedOffset> {
        let (sign, digits) = match timezone.split_at_checked(1) {
            Some(("+", digits)) => (1, digits),
            Some(("-", digits)) => (-1, digits),
            _ => anyhow::bail!("Invalid timezone {timezone:?}"),
        };
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("Invalid timezone {timezone:?}");
        }

        let hours = digits[..2].parse::<i32>()?;
        let minutes = digits[2..].parse::<i32>()?;

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .with_context(|| format!("Timezone out of range {timezone:?}"))
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let offset = Self::parse_offset(parts[0])?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name: parts[2].to_string(),
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID (None for the first commit)
    parent: Option<ObjectId>,
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    author: Author,
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            message,
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        pack(self.object_type(), self.display().as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                next_line = lines
                    .next()
                    .context("Invalid commit object: missing author line")?;
                Some(ObjectId::try_parse(parent_oid.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        if lines.next().is_some() {
            anyhow::bail!("Invalid commit object: unexpected header line");
        }

        Ok(Self::new(parent, tree_oid, author, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
