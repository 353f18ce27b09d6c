use thiserror::Error;

use crate::document::{Collection, Revision};

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// A revision check failed when writing a document.
    /// The expected revision did not match the stored revision.
    #[error("Revision conflict for document {id}: expected revision {expected}, found {actual}")]
    RevisionConflict {
        id: String,
        expected: Revision,
        actual: Revision,
    },

    /// The requested document was not found.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    /// The storage backend refused or could not complete the operation.
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for document store operations.
pub type Result<T> = std::result::Result<T, DocStoreError>;
