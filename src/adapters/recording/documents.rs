//! Recording adapter for the `DocumentStore` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Document, DocumentFuture, DocumentStore, Fields, RangeQuery};

/// Records document store calls while delegating to an inner store.
pub struct RecordingDocumentStore {
    inner: Box<dyn DocumentStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingDocumentStore {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn DocumentStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct GetInput<'a> {
    collection: &'a str,
    id: &'a str,
}

#[derive(Serialize)]
struct MergeInput<'a> {
    collection: &'a str,
    id: &'a str,
    fields: &'a Fields,
}

#[derive(Serialize)]
struct QueryRangeInput<'a> {
    collection: &'a str,
    query: &'a RangeQuery,
}

impl DocumentStore for RecordingDocumentStore {
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> DocumentFuture<'a, Option<Document>> {
        Box::pin(async move {
            let result = self.inner.get(collection, id).await;
            record_result(&self.recorder, "documents", "get", &GetInput { collection, id }, &result);
            result
        })
    }

    fn merge<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: &'a Fields,
    ) -> DocumentFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.merge(collection, id, fields).await;
            let input = MergeInput { collection, id, fields };
            record_result(&self.recorder, "documents", "merge", &input, &result);
            result
        })
    }

    fn query_range<'a>(
        &'a self,
        collection: &'a str,
        query: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>> {
        Box::pin(async move {
            let result = self.inner.query_range(collection, query).await;
            let input = QueryRangeInput { collection, query };
            record_result(&self.recorder, "documents", "query_range", &input, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::live::LocalDocumentStore;
    use crate::cassette::format::Cassette;

    #[tokio::test]
    async fn records_inputs_and_structured_results() {
        let dir = std::env::temp_dir().join("certify_rec_documents_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("documents.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "documents")));
        {
            let store = RecordingDocumentStore::new(
                Box::new(LocalDocumentStore::in_memory()),
                Arc::clone(&recorder),
            );
            let fields: Fields = [("holderName".to_string(), "Jane Doe".to_string())].into();
            store.merge("certificates", "24-ABC123", &fields).await.unwrap();
            store.get("certificates", "24-ABC123").await.unwrap();
            store.get("certificates", "missing").await.unwrap();
            store
                .query_range("certificates", &RangeQuery::prefix("holderName", "Ja"))
                .await
                .unwrap();
        }
        Arc::try_unwrap(recorder).unwrap().into_inner().unwrap().finish().unwrap();

        let cassette = Cassette::load(&path).unwrap();
        let methods: Vec<&str> = cassette.interactions.iter().map(|i| i.method.as_str()).collect();
        assert_eq!(methods, vec!["merge", "get", "get", "query_range"]);

        let merge = &cassette.interactions[0];
        assert_eq!(merge.input["fields"]["holderName"], "Jane Doe");
        assert_eq!(merge.output, json!({"ok": null}));
        assert_eq!(cassette.interactions[1].output["ok"]["id"], "24-ABC123");
        assert_eq!(cassette.interactions[2].output, json!({"ok": null}));
        assert_eq!(cassette.interactions[3].input["query"]["end"], "Ja\u{f8ff}");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
