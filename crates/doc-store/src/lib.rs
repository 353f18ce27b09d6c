//! Document store for the storefront backend.
//!
//! Persists JSON documents in named collections, each document carrying an
//! integer revision used for optimistic concurrency control: a write can
//! name the revision it read, and fails if another writer got there first.
//!
//! Two implementations are provided: [`MemoryDocumentStore`] for tests and
//! database-free runs, and [`PostgresDocumentStore`] backed by a JSONB
//! table.

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use document::{Collection, RawDocument, Revision, Stored};
pub use error::{DocStoreError, Result};
pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{DocumentStore, DocumentStoreExt, PutOptions};
