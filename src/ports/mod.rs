//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the certificate core and the
//! outside world (time, randomness, the document database).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod documents;
pub mod id_gen;

pub use clock::Clock;
pub use documents::{
    Document, DocumentError, DocumentFuture, DocumentStore, Fields, RangeQuery, PREFIX_SENTINEL,
};
pub use id_gen::IdGenerator;
