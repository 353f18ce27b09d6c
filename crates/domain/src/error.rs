//! Domain error types.

use doc_store::DocStoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The price is not usable.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: f64 },

    /// The stock quantity is not usable.
    #[error("Invalid quantity: {quantity} (must not be negative)")]
    InvalidQuantity { quantity: i64 },

    /// The email address is not usable.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// A user with this email address already exists.
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    /// An error occurred in the document store.
    #[error("Document store error: {0}")]
    Store(#[from] DocStoreError),
}

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
