use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::document::{Collection, RawDocument, Revision, Stored};
use crate::error::Result;

/// Options controlling how a document write behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PutOptions {
    /// Expected current revision of the document, for optimistic
    /// concurrency control. When None, the write is unconditional and the
    /// last writer wins.
    pub expected_rev: Option<Revision>,
}

impl PutOptions {
    /// Creates options with no revision check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the document to be at a specific revision.
    pub fn expect_rev(rev: Revision) -> Self {
        Self {
            expected_rev: Some(rev),
        }
    }

    /// Creates options expecting the document to not exist yet.
    pub fn expect_new() -> Self {
        Self {
            expected_rev: Some(Revision::initial()),
        }
    }
}

/// Core trait for document store implementations.
///
/// A document store keeps JSON documents in named collections, each keyed
/// by a string identifier and carrying a revision counter. Writes can name
/// the revision they read, turning every update into a compare-and-swap.
/// All implementations must be safe to share across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Retrieves a single document by identifier.
    /// Returns None if the document does not exist.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>>;

    /// Retrieves the documents matching the given identifiers, ordered by
    /// identifier.
    ///
    /// Identifiers with no matching document are silently omitted from the
    /// result; the caller decides whether absence is an error. Duplicate
    /// identifiers yield a single document.
    async fn find_by_ids(&self, collection: Collection, ids: &[String])
    -> Result<Vec<RawDocument>>;

    /// Retrieves the documents whose body has `field` equal to the given
    /// string value, ordered by identifier.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>>;

    /// Retrieves all documents in a collection, ordered by identifier.
    async fn list(&self, collection: Collection) -> Result<Vec<RawDocument>>;

    /// Writes a document, creating it or replacing its body.
    ///
    /// When `options.expected_rev` is set and the stored revision differs,
    /// the write fails with `RevisionConflict` and nothing changes.
    ///
    /// Returns the revision the document holds after the write.
    async fn put(
        &self,
        collection: Collection,
        id: &str,
        body: serde_json::Value,
        options: PutOptions,
    ) -> Result<Revision>;

    /// Deletes a document.
    /// Fails with `NotFound` if the document does not exist.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

/// Extension trait providing typed convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Retrieves a document and decodes its body into a typed value.
    async fn get_typed<T: DeserializeOwned + Send>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Stored<T>>> {
        match self.get(collection, id).await? {
            Some(raw) => Ok(Some(raw.into_typed()?)),
            None => Ok(None),
        }
    }

    /// Serializes a typed value and writes it as the document body.
    async fn put_typed<T: Serialize + Sync>(
        &self,
        collection: Collection,
        id: &str,
        doc: &T,
        options: PutOptions,
    ) -> Result<Revision> {
        let body = serde_json::to_value(doc)?;
        self.put(collection, id, body, options).await
    }

    /// Checks whether a document exists.
    async fn exists(&self, collection: Collection, id: &str) -> Result<bool> {
        Ok(self.get(collection, id).await?.is_some())
    }
}

impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}
