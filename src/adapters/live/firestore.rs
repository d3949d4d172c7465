//! Live adapter for the `DocumentStore` port using the Firestore REST API.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::FirestoreConfig;
use crate::ports::{Document, DocumentError, DocumentFuture, DocumentStore, Fields, RangeQuery};

/// Live document store that talks to Firestore over HTTPS.
pub struct FirestoreDocumentStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreDocumentStore {
    /// Creates a new Firestore client for the configured project and database.
    #[must_use]
    pub fn new(config: FirestoreConfig) -> Self {
        Self { client: Client::new(), config }
    }

    /// `{base}/projects/{project}/databases/{database}/<last>/<rest..>`
    fn url(&self, last: &str, rest: &[&str]) -> Result<Url, DocumentError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| DocumentError::Rejected(format!("invalid Firestore URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| DocumentError::Rejected(format!("Firestore URL cannot be a base: {base}")))?
            .pop_if_empty()
            .extend([
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                last,
            ])
            .extend(rest);
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        let url = self.url("documents", &[collection, id])?;
        tracing::debug!(%url, "firestore get");
        let response = send(self.authorize(self.client.get(url))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = read_success(response).await?;
        let wire: WireDocument = parse(&body)?;
        wire.into_document().map(Some)
    }

    async fn patch(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), DocumentError> {
        let mut url = self.url("documents", &[collection, id])?;
        {
            let mut query = url.query_pairs_mut();
            for name in fields.keys() {
                query.append_pair("updateMask.fieldPaths", name);
            }
        }
        let encoded: Map<String, Value> =
            fields.iter().map(|(k, v)| (k.clone(), json!({ "stringValue": v }))).collect();
        tracing::debug!(%url, fields = fields.len(), "firestore merge");
        let response =
            send(self.authorize(self.client.patch(url).json(&json!({ "fields": encoded })))).await?;
        read_success(response).await.map(|_| ())
    }

    async fn run_query(
        &self,
        collection: &str,
        query: &RangeQuery,
    ) -> Result<Vec<Document>, DocumentError> {
        let url = self.url("documents:runQuery", &[])?;
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "compositeFilter": {
                        "op": "AND",
                        "filters": [
                            field_filter(&query.field, "GREATER_THAN_OR_EQUAL", &query.start),
                            field_filter(&query.field, "LESS_THAN", &query.end),
                        ],
                    }
                }
            }
        });
        tracing::debug!(%url, field = %query.field, "firestore range query");
        let response = send(self.authorize(self.client.post(url).json(&body))).await?;
        let text = read_success(response).await?;
        let rows: Vec<QueryRow> = parse(&text)?;
        rows.into_iter().filter_map(|row| row.document).map(WireDocument::into_document).collect()
    }
}

impl DocumentStore for FirestoreDocumentStore {
    fn get<'a>(&'a self, collection: &'a str, id: &'a str) -> DocumentFuture<'a, Option<Document>> {
        Box::pin(self.fetch(collection, id))
    }

    fn merge<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: &'a Fields,
    ) -> DocumentFuture<'a, ()> {
        Box::pin(self.patch(collection, id, fields))
    }

    fn query_range<'a>(
        &'a self,
        collection: &'a str,
        query: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>> {
        Box::pin(self.run_query(collection, query))
    }
}

fn field_filter(field: &str, op: &str, value: &str) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field },
            "op": op,
            "value": { "stringValue": value },
        }
    })
}

/// Document as returned by the REST API.
#[derive(Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl WireDocument {
    fn into_document(self) -> Result<Document, DocumentError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DocumentError::Malformed(format!("bad document name {:?}", self.name)))?
            .to_string();
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| decode_value(&id, name, value).map(|v| (name.clone(), v)))
            .collect::<Result<Fields, _>>()?;
        Ok(Document { id, fields })
    }
}

/// One element of a `runQuery` response stream.
#[derive(Deserialize)]
struct QueryRow {
    document: Option<WireDocument>,
}

/// Error body returned by Google APIs.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Detail inside an API error body.
#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn decode_value(id: &str, name: &str, value: &Value) -> Result<String, DocumentError> {
    value
        .get("stringValue")
        .or_else(|| value.get("timestampValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            DocumentError::Malformed(format!("field {name} of document {id} is not a string: {value}"))
        })
}

async fn send(request: RequestBuilder) -> Result<Response, DocumentError> {
    request
        .send()
        .await
        .map_err(|e| DocumentError::Unavailable(format!("Firestore request failed: {e}")))
}

async fn read_success(response: Response) -> Result<String, DocumentError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DocumentError::Unavailable(format!("failed to read Firestore response: {e}")))?;
    if status.is_success() {
        return Ok(text);
    }

    let msg = serde_json::from_str::<ApiError>(&text).map(|e| e.error.message).unwrap_or(text);
    let msg = format!("Firestore error ({}): {msg}", status.as_u16());
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DocumentError::Denied(msg),
        StatusCode::TOO_MANY_REQUESTS => DocumentError::Unavailable(msg),
        s if s.is_server_error() => DocumentError::Unavailable(msg),
        _ => DocumentError::Rejected(msg),
    })
}

fn parse<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, DocumentError> {
    serde_json::from_str(text)
        .map_err(|e| DocumentError::Malformed(format!("failed to parse Firestore response: {e}")))
}
