//! Document store port for the external certificate database.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest private-use codepoint, used as the exclusive upper bound of a
/// prefix range.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// String-valued fields of a stored document, keyed by field name.
pub type Fields = BTreeMap<String, String>;

/// Boxed future type alias used by [`DocumentStore`] to keep the trait dyn-compatible.
pub type DocumentFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DocumentError>> + Send + 'a>>;

/// A document read from a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The document key within its collection.
    pub id: String,
    /// The stored fields.
    pub fields: Fields,
}

/// A lexicographic range over one string field: `start <= value < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQuery {
    /// Name of the field being scanned.
    pub field: String,
    /// Inclusive lower bound.
    pub start: String,
    /// Exclusive upper bound.
    pub end: String,
}

impl RangeQuery {
    /// Builds a "starts with" query for stores that only offer ordered
    /// range scans: `[prefix, prefix + U+F8FF)`.
    #[must_use]
    pub fn prefix(field: impl Into<String>, prefix: &str) -> Self {
        let mut end = String::with_capacity(prefix.len() + PREFIX_SENTINEL.len_utf8());
        end.push_str(prefix);
        end.push(PREFIX_SENTINEL);
        Self { field: field.into(), start: prefix.to_string(), end }
    }

    /// Returns `true` if `value` falls inside the range.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        value >= self.start.as_str() && value < self.end.as_str()
    }
}

/// Failures reported by a document store.
///
/// Absence of a document is not an error; see [`DocumentStore::get`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum DocumentError {
    /// The store could not be reached or failed server-side.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    /// The store refused the caller's credentials.
    #[error("document store denied access: {0}")]
    Denied(String),
    /// The store rejected the request as invalid.
    #[error("document store rejected the request: {0}")]
    Rejected(String),
    /// The store returned data that could not be decoded.
    #[error("malformed document data: {0}")]
    Malformed(String),
}

/// Keyed document storage with point reads, merge writes and range scans.
///
/// Abstracting the database allows the certificate store to run against
/// Firestore, a local file, or a replayed cassette.
pub trait DocumentStore: Send + Sync {
    /// Reads a single document, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or denies the read.
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> DocumentFuture<'a, Option<Document>>;

    /// Writes `fields` into the document, creating it if needed.
    ///
    /// Fields already stored but absent from `fields` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or rejects the write.
    fn merge<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: &'a Fields,
    ) -> DocumentFuture<'a, ()>;

    /// Returns every document whose `query.field` lies inside the range,
    /// in the order the store yields them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or rejects the query.
    fn query_range<'a>(
        &'a self,
        collection: &'a str,
        query: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>>;
}
