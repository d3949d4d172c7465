//! Certificate store: the application's only path to certificate records.
//!
//! Wraps the `DocumentStore` port with three operations:
//!
//! - `fetch_by_id`: exact key lookup, `None` when absent.
//! - `search`: exact ID first; only when that misses, a holder-name
//!   prefix scan. An ID hit never mixes in name matches.
//! - `create`: validate, merge-write, then read back to prove the write
//!   landed.
//!
//! Nothing here retries. Every failure goes back to the caller.

mod error;

pub use error::CertificateError;

use chrono::{Datelike, SecondsFormat};

use crate::certificate::{
    Certificate, NewCertificate, ValidationError, CREATED_AT, DEFAULT_ISSUE_TIME, HOLDER_NAME,
    ISSUE_TIME, YEAR,
};
use crate::context::ServiceContext;
use crate::ports::{Document, DocumentError, RangeQuery};

/// Certificate persistence over the context's document store.
pub struct CertificateStore<'a> {
    ctx: &'a ServiceContext,
    collection: String,
}

impl<'a> CertificateStore<'a> {
    /// Creates a store over `collection`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, collection: impl Into<String>) -> Self {
        Self { ctx, collection: collection.into() }
    }

    /// Generates a fresh certificate ID. See [`crate::id`].
    #[must_use]
    pub fn generate_id(&self) -> String {
        self.ctx.id_gen.generate_id()
    }

    /// Looks up a certificate by exact ID.
    ///
    /// An empty ID can never have been written and returns `None` without
    /// touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Store`] if the store fails or holds a
    /// malformed record.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<Certificate>, CertificateError> {
        if id.is_empty() {
            return Ok(None);
        }
        tracing::debug!(collection = %self.collection, id, "fetching certificate");
        let document = self
            .ctx
            .documents
            .get(&self.collection, id)
            .await
            .map_err(|e| self.store_failure("fetch", id, e))?;
        document.map(|doc| self.decode(doc)).transpose()
    }

    /// Finds certificates by exact ID or, failing that, by holder-name prefix.
    ///
    /// Name matches come back in store order.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Validation`] for an empty query and
    /// [`CertificateError::Store`] if the store fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Certificate>, CertificateError> {
        if query.is_empty() {
            return Err(ValidationError { missing: vec!["query"] }.into());
        }
        if let Some(certificate) = self.fetch_by_id(query).await? {
            return Ok(vec![certificate]);
        }

        let range = RangeQuery::prefix(HOLDER_NAME, query);
        tracing::debug!(collection = %self.collection, query, "searching certificates by holder name");
        let documents = self
            .ctx
            .documents
            .query_range(&self.collection, &range)
            .await
            .map_err(|e| self.store_failure("search", query, e))?;
        documents.into_iter().map(|doc| self.decode(doc)).collect()
    }

    /// Creates (or augments) the certificate stored under `id`.
    ///
    /// Stamps `createdAt` from the clock. `issueTime` and `year` fall back
    /// to `12:00` and the current year, but only when neither `data` nor
    /// the stored record already carries them. Fields stored under `id`
    /// and absent from `data` are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Validation`] before any store call if a
    /// required field is blank, [`CertificateError::Store`] if the store
    /// fails, and [`CertificateError::Integrity`] if the record cannot be
    /// read back after writing.
    pub async fn create(
        &self,
        id: &str,
        data: &NewCertificate,
    ) -> Result<Certificate, CertificateError> {
        data.validate(id)?;

        let existing = self
            .ctx
            .documents
            .get(&self.collection, id)
            .await
            .map_err(|e| self.store_failure("create", id, e))?
            .map(|doc| doc.fields)
            .unwrap_or_default();

        let now = self.ctx.clock.now();
        let mut fields = data.fields();
        if data.issue_time().is_none() && !existing.contains_key(ISSUE_TIME) {
            fields.insert(ISSUE_TIME.to_string(), DEFAULT_ISSUE_TIME.to_string());
        }
        if data.year().is_none() && !existing.contains_key(YEAR) {
            fields.insert(YEAR.to_string(), now.year().to_string());
        }
        fields.insert(CREATED_AT.to_string(), now.to_rfc3339_opts(SecondsFormat::Millis, true));

        self.ctx
            .documents
            .merge(&self.collection, id, &fields)
            .await
            .map_err(|e| self.store_failure("create", id, e))?;
        tracing::info!(collection = %self.collection, id, "certificate written");

        match self.fetch_by_id(id).await? {
            Some(certificate) => Ok(certificate),
            None => {
                tracing::error!(collection = %self.collection, id, "certificate missing after write");
                Err(CertificateError::Integrity { id: id.to_string() })
            }
        }
    }

    /// Issues the demonstration certificate under a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns any error [`CertificateStore::create`] returns.
    pub async fn seed_sample(&self) -> Result<Certificate, CertificateError> {
        let id = self.generate_id();
        let sample = NewCertificate::new("John Doe", "Web Development Workshop", "2023-10-15")
            .with_issue_time("14:30")
            .with_year("2023");
        self.create(&id, &sample).await
    }

    fn decode(&self, document: Document) -> Result<Certificate, CertificateError> {
        let id = document.id.clone();
        Certificate::from_document(document).map_err(|e| self.store_failure("decode", &id, e))
    }

    fn store_failure(&self, operation: &str, key: &str, error: DocumentError) -> CertificateError {
        tracing::error!(collection = %self.collection, operation, key, %error, "certificate store failure");
        CertificateError::Store(error)
    }
}
