//! Replaying adapter for the `DocumentStore` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Document, DocumentFuture, DocumentStore, Fields, RangeQuery};

/// Serves recorded document store results from a cassette.
///
/// Inputs are not matched; each call takes the next recorded result for
/// its method.
pub struct ReplayingDocumentStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingDocumentStore {
    /// Creates a replaying store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl DocumentStore for ReplayingDocumentStore {
    fn get<'a>(&'a self, _collection: &'a str, _id: &'a str) -> DocumentFuture<'a, Option<Document>> {
        let output = next_output(&self.replayer, "documents", "get");
        Box::pin(async move { replay_result(output, "documents::get") })
    }

    fn merge<'a>(
        &'a self,
        _collection: &'a str,
        _id: &'a str,
        _fields: &'a Fields,
    ) -> DocumentFuture<'a, ()> {
        let output = next_output(&self.replayer, "documents", "merge");
        Box::pin(async move { replay_result(output, "documents::merge") })
    }

    fn query_range<'a>(
        &'a self,
        _collection: &'a str,
        _query: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>> {
        let output = next_output(&self.replayer, "documents", "query_range");
        Box::pin(async move { replay_result(output, "documents::query_range") })
    }
}
