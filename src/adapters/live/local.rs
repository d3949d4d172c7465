//! Local document store kept in memory and optionally mirrored to a JSON file.

use std::collections::BTreeMap;
use std::future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::{Document, DocumentError, DocumentFuture, DocumentStore, Fields, RangeQuery};

type Collections = BTreeMap<String, BTreeMap<String, Fields>>;

/// Document store backed by an in-process map.
///
/// When opened on a path the whole store is loaded from that JSON file and
/// rewritten after every merge, which is enough for offline issuing and
/// for tests. Range scans yield documents in ID order.
pub struct LocalDocumentStore {
    path: Option<PathBuf>,
    collections: Mutex<Collections>,
}

impl LocalDocumentStore {
    /// Creates an empty store that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { path: None, collections: Mutex::new(Collections::new()) }
    }

    /// Opens a store persisted at `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let collections = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                DocumentError::Unavailable(format!("failed to read {}: {e}", path.display()))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                DocumentError::Malformed(format!("failed to parse {}: {e}", path.display()))
            })?
        } else {
            Collections::new()
        };
        Ok(Self { path: Some(path.to_path_buf()), collections: Mutex::new(collections) })
    }

    fn read_document(&self, collection: &str, id: &str) -> Option<Document> {
        let collections = self.collections.lock().expect("local store lock poisoned");
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document { id: id.to_string(), fields: fields.clone() })
    }

    /// Applies the merge to a copy and installs it only once persisted, so a
    /// failed write leaves the visible state untouched.
    fn merge_document(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), DocumentError> {
        let mut collections = self.collections.lock().expect("local store lock poisoned");
        let mut updated = collections.clone();
        updated
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default()
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.persist(&updated)?;
        *collections = updated;
        Ok(())
    }

    fn scan(&self, collection: &str, query: &RangeQuery) -> Vec<Document> {
        let collections = self.collections.lock().expect("local store lock poisoned");
        collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|(_, fields)| fields.get(&query.field).is_some_and(|v| query.contains(v)))
            .map(|(id, fields)| Document { id: id.clone(), fields: fields.clone() })
            .collect()
    }

    fn persist(&self, collections: &Collections) -> Result<(), DocumentError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DocumentError::Unavailable(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(collections)
            .map_err(|e| DocumentError::Malformed(format!("failed to encode store: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            DocumentError::Unavailable(format!("failed to write {}: {e}", path.display()))
        })
    }
}

impl DocumentStore for LocalDocumentStore {
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> DocumentFuture<'a, Option<Document>> {
        Box::pin(future::ready(Ok(self.read_document(collection, id))))
    }

    fn merge<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: &'a Fields,
    ) -> DocumentFuture<'a, ()> {
        Box::pin(future::ready(self.merge_document(collection, id, fields)))
    }

    fn query_range<'a>(
        &'a self,
        collection: &'a str,
        query: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>> {
        Box::pin(future::ready(Ok(self.scan(collection, query))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[tokio::test]
    async fn get_missing_document_returns_none() {
        let store = LocalDocumentStore::in_memory();
        assert!(store.get("certificates", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn merge_preserves_unmentioned_fields() {
        let store = LocalDocumentStore::in_memory();
        store.merge("c", "1", &fields(&[("a", "1"), ("b", "2")])).await.unwrap();
        store.merge("c", "1", &fields(&[("b", "3"), ("c", "4")])).await.unwrap();

        let doc = store.get("c", "1").await.unwrap().unwrap();
        assert_eq!(doc.fields, fields(&[("a", "1"), ("b", "3"), ("c", "4")]));
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = LocalDocumentStore::in_memory();
        store.merge("one", "1", &fields(&[("a", "1")])).await.unwrap();
        assert!(store.get("two", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn range_scan_filters_on_field() {
        let store = LocalDocumentStore::in_memory();
        store.merge("c", "3", &fields(&[("name", "Janet")])).await.unwrap();
        store.merge("c", "1", &fields(&[("name", "Jane Doe")])).await.unwrap();
        store.merge("c", "2", &fields(&[("name", "John")])).await.unwrap();
        store.merge("c", "4", &fields(&[("other", "Jane")])).await.unwrap();

        let query = RangeQuery::prefix("name", "Jan");
        let ids: Vec<String> =
            store.query_range("c", &query).await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn persists_and_reloads_from_file() {
        let dir = std::env::temp_dir().join("certify_local_store_reload");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("store.json");

        {
            let store = LocalDocumentStore::open(&path).unwrap();
            store.merge("certificates", "24-AAAAAA", &fields(&[("holderName", "Ada")])).await.unwrap();
        }
        assert!(path.exists());

        let reopened = LocalDocumentStore::open(&path).unwrap();
        let doc = reopened.get("certificates", "24-AAAAAA").await.unwrap().unwrap();
        assert_eq!(doc.fields.get("holderName").map(String::as_str), Some("Ada"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failed_persist_leaves_store_unchanged() {
        let dir = std::env::temp_dir().join("certify_local_store_blocked");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the store's parent directory should be.
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let store = LocalDocumentStore::open(&blocker.join("store.json")).unwrap();
        let err = store
            .merge("certificates", "24-ABC123", &fields(&[("holderName", "Jane")]))
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::Unavailable(_)), "got {err:?}");
        assert!(store.get("certificates", "24-ABC123").await.unwrap().is_none());
        let query = RangeQuery::prefix("holderName", "Ja");
        assert!(store.query_range("certificates", &query).await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let dir = std::env::temp_dir().join("certify_local_store_corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let result = LocalDocumentStore::open(&path);
        assert!(matches!(result, Err(DocumentError::Malformed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
