//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files
//! (blobs) and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are kept in a `BTreeMap`, so the encoding (and therefore the tree
//! ID) does not depend on the order the working directory was walked in.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, pack};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Component, Path};

/// Internal tree entry representation
///
/// Can be:
/// - Stored: A blob, or a sub-tree that has not been expanded
/// - Directory: A nested tree being built
#[derive(Debug, Clone, PartialEq, Eq)]
enum TreeEntry {
    Stored(DatabaseEntry),
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::Stored(entry) => entry.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::Stored(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }

    fn to_database_entry(&self) -> anyhow::Result<DatabaseEntry> {
        Ok(DatabaseEntry::new(self.oid()?, self.mode()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree from `(relative path, blob entry)` pairs
    ///
    /// Intermediate directories are created as nested trees.
    pub fn build<'p>(
        files: impl IntoIterator<Item = (&'p Path, DatabaseEntry)>,
    ) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for (path, entry) in files {
            let components = path
                .components()
                .map(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(str::to_string)
                        .with_context(|| format!("Non UTF-8 path {:?}", path)),
                    _ => Err(anyhow::anyhow!("Invalid relative path {:?}", path)),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            root.add_entry(&components, entry)?;
        }

        Ok(root)
    }

    /// Add an entry to the tree at the appropriate location
    ///
    /// Creates intermediate directory entries as needed.
    fn add_entry(&mut self, components: &[String], entry: DatabaseEntry) -> anyhow::Result<()> {
        match components {
            [] => anyhow::bail!("Cannot add an entry with an empty path"),
            [name] => {
                self.entries.insert(name.clone(), TreeEntry::Stored(entry));
            }
            [parent, rest @ ..] => {
                let subtree = self
                    .entries
                    .entry(parent.clone())
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match subtree {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, entry)?,
                    TreeEntry::Stored(_) => {
                        anyhow::bail!("{} is both a file and a directory", parent)
                    }
                }
            }
        }

        Ok(())
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Visits children before parents, so every sub-tree is handed out before
    /// the tree that references it.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Option<DatabaseEntry>> {
        self.entries
            .get(name)
            .map(TreeEntry::to_database_entry)
            .transpose()
    }

    /// Entries in name order
    pub fn entries(&self) -> anyhow::Result<Vec<(String, DatabaseEntry)>> {
        self.entries
            .iter()
            .map(|(name, entry)| Ok((name.clone(), entry.to_database_entry()?)))
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (name, tree_entry) in &self.entries {
            let header = format!("{} {}", tree_entry.mode().as_str(), name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            tree_entry.oid()?.write_h40_to(&mut content_bytes)?;
        }

        pack(self.object_type(), &content_bytes)
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }
            let mode = EntryMode::try_from(std::str::from_utf8(&mode_bytes)?)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, TreeEntry::Stored(DatabaseEntry::new(oid, mode)));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, tree_entry)| {
                let mode = tree_entry.mode();
                let object_type = if mode.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };

                format!(
                    "{} {} {}\t{}",
                    mode.as_str(),
                    object_type,
                    tree_entry.oid().unwrap_or_default(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
