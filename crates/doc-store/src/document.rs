use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Logical collection a document belongs to.
///
/// Collections partition the document keyspace; the same identifier can
/// exist in two collections without clashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Orders,
    Users,
    Sessions,
}

impl Collection {
    /// Returns the collection name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Users => "users",
            Collection::Sessions => "sessions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Revision number of a document, used for optimistic concurrency control.
///
/// A document gets revision 1 when first written; every subsequent write
/// increments it by one. Revision 0 means "does not exist yet" and only
/// appears in write expectations, never on a stored document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    /// Creates a revision from a raw number.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The revision of a document that does not exist yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// The revision a document gets on its first write.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next revision.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw revision number.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Revision {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Revision> for i64 {
    fn from(revision: Revision) -> Self {
        revision.0
    }
}

/// A document as stored: identifier, revision, and raw JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub rev: Revision,
    pub body: serde_json::Value,
}

impl RawDocument {
    /// Decodes the JSON body into a typed document, keeping the revision.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Stored<T>> {
        Ok(Stored {
            rev: self.rev,
            doc: serde_json::from_value(self.body)?,
        })
    }
}

/// A typed document together with the revision it was read at.
///
/// The revision is what a caller hands back to [`PutOptions::expect_rev`]
/// when writing a modified copy of the document.
///
/// [`PutOptions::expect_rev`]: crate::store::PutOptions::expect_rev
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub rev: Revision,
    pub doc: T,
}
