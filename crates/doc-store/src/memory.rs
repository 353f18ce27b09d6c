use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::document::{Collection, RawDocument, Revision};
use crate::error::{DocStoreError, Result};
use crate::store::{DocumentStore, PutOptions};

/// In-memory document store implementation.
///
/// Keeps every collection in a map guarded by a read-write lock. Used for
/// tests and for running the server without a database; revision semantics
/// match the PostgreSQL implementation exactly.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, HashMap<String, RawDocument>>>>,
    fail_writes: Arc<RwLock<FailWrites>>,
}

/// Write failure injection state, keyed per collection or per document.
#[derive(Debug, Default)]
struct FailWrites {
    collections: HashSet<Collection>,
    documents: HashSet<(Collection, String)>,
}

impl MemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, |docs| docs.len())
    }

    /// Removes all documents from all collections.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }

    /// Makes every write to the given collection fail with `Unavailable`.
    /// Reads are unaffected. Used to exercise partial-failure paths.
    pub async fn set_fail_writes(&self, collection: Collection, fail: bool) {
        let mut failing = self.fail_writes.write().await;
        if fail {
            failing.collections.insert(collection);
        } else {
            failing.collections.remove(&collection);
        }
    }

    /// Makes writes to a single document fail with `Unavailable`.
    pub async fn set_fail_writes_for(&self, collection: Collection, id: &str, fail: bool) {
        let mut failing = self.fail_writes.write().await;
        let key = (collection, id.to_string());
        if fail {
            failing.documents.insert(key);
        } else {
            failing.documents.remove(&key);
        }
    }

    async fn write_should_fail(&self, collection: Collection, id: &str) -> bool {
        let failing = self.fail_writes.read().await;
        failing.collections.contains(&collection)
            || failing.documents.contains(&(collection, id.to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for id in ids {
            if seen.insert(id.as_str())
                && let Some(doc) = docs.get(id.as_str())
            {
                found.push(doc.clone());
            }
        }
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<RawDocument> = docs
            .values()
            .filter(|doc| doc.body.get(field).and_then(|v| v.as_str()) == Some(value))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut all: Vec<RawDocument> = docs.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn put(
        &self,
        collection: Collection,
        id: &str,
        body: serde_json::Value,
        options: PutOptions,
    ) -> Result<Revision> {
        if self.write_should_fail(collection, id).await {
            return Err(DocStoreError::Unavailable(format!(
                "write to {collection}/{id} refused"
            )));
        }

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        let actual = docs.get(id).map_or(Revision::initial(), |doc| doc.rev);
        if let Some(expected) = options.expected_rev
            && actual != expected
        {
            return Err(DocStoreError::RevisionConflict {
                id: id.to_string(),
                expected,
                actual,
            });
        }

        let rev = actual.next();
        docs.insert(
            id.to_string(),
            RawDocument {
                id: id.to_string(),
                rev,
                body,
            },
        );
        Ok(rev)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id));

        if removed.is_none() {
            return Err(DocStoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
