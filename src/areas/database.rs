use crate::areas::storage::{EntryStore, join_key};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::io::{BufRead, Cursor, Read, Write};
use std::sync::Arc;

/// Key prefix of the object area
pub const OBJECTS_PREFIX: &str = "objects";

/// Content-addressed object database
///
/// Objects are zlib-compressed and keyed by the SHA-1 of their uncompressed
/// encoding. An object is written at most once; storing identical content
/// again only costs an existence check.
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<dyn EntryStore>,
}

impl Database {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Database { store }
    }

    fn object_key(object_id: &ObjectId) -> String {
        join_key(OBJECTS_PREFIX, &object_id.to_key())
    }

    pub fn contains(&self, object_id: &ObjectId) -> Result<bool> {
        self.store.contains(&Self::object_key(object_id))
    }

    /// Store raw bytes as a blob and return its ID
    pub fn put(&self, data: impl Into<Bytes>) -> Result<ObjectId> {
        self.store(&Blob::new(data))
    }

    /// Store an object unless it already exists, returning its ID
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_content = object
            .serialize()
            .map_err(|e| RepositoryError::corrupt(object.object_type(), format!("{e:#}")))?;
        let object_id = ObjectId::hash(&object_content);
        let object_key = Self::object_key(&object_id);

        if self.store.contains(&object_key)? {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let compressed = Self::compress(&object_content)
            .map_err(|e| RepositoryError::storage(&object_key, e))?;

        // a concurrent writer may have published the same content meanwhile
        if self.store.create(&object_key, &compressed)? {
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    /// Load the uncompressed encoding of an object
    pub fn load(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_key = Self::object_key(object_id);
        let compressed = self
            .store
            .read(&object_key)?
            .ok_or_else(|| RepositoryError::ObjectNotFound {
                oid: object_id.to_string(),
            })?;

        let object_content = Self::decompress(&compressed)
            .map_err(|e| RepositoryError::corrupt(object_id, format!("cannot decompress: {e}")))?;

        if ObjectId::hash(&object_content) != *object_id {
            return Err(RepositoryError::corrupt(object_id, "content does not match its id"));
        }

        Ok(object_content)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        let object = match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader).map(|blob| ObjectBox::Blob(Box::new(blob))),
            ObjectType::Tree => Tree::deserialize(object_reader).map(|tree| ObjectBox::Tree(Box::new(tree))),
            ObjectType::Commit => {
                Commit::deserialize(object_reader).map(|commit| ObjectBox::Commit(Box::new(commit)))
            }
        };

        object.map_err(|e| RepositoryError::corrupt(object_id, format!("{e:#}")))
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        self.parse_object_as(object_id, ObjectType::Blob)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        self.parse_object_as(object_id, ObjectType::Tree)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        self.parse_object_as(object_id, ObjectType::Commit)
    }

    /// Get the type of an object without decoding its content
    pub fn object_type(&self, object_id: &ObjectId) -> Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as<T: Unpackable>(
        &self,
        object_id: &ObjectId,
        expected: ObjectType,
    ) -> Result<T> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        if object_type != expected {
            return Err(RepositoryError::corrupt(
                object_id,
                format!("expected a {expected}, found a {object_type}"),
            ));
        }

        T::deserialize(object_reader).map_err(|e| RepositoryError::corrupt(object_id, format!("{e:#}")))
    }

    fn parse_object_as_bytes(&self, object_id: &ObjectId) -> Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .map_err(|e| RepositoryError::corrupt(object_id, format!("{e:#}")))?;

        Ok((object_type, object_reader))
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }
}
