//! Certificate records and their stored representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::{Document, DocumentError, Fields};

/// Stored field holding the certificate holder's name.
pub const HOLDER_NAME: &str = "holderName";
/// Stored field holding the event or reason for issuance.
pub const EVENT: &str = "event";
/// Stored field holding the `YYYY-MM-DD` issue date.
pub const ISSUE_DATE: &str = "issueDate";
/// Stored field holding the free-form issue time.
pub const ISSUE_TIME: &str = "issueTime";
/// Stored field holding the issue year.
pub const YEAR: &str = "year";
/// Stored field holding the RFC 3339 write timestamp.
pub const CREATED_AT: &str = "createdAt";

/// Issue time written when the caller supplies none.
pub const DEFAULT_ISSUE_TIME: &str = "12:00";

/// An issued certificate as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// The certificate ID (document key).
    pub id: String,
    /// Name of the person the certificate was issued to.
    pub holder_name: String,
    /// Event or reason for issuance.
    pub event: String,
    /// Issue date, normally `YYYY-MM-DD`.
    pub issue_date: String,
    /// Issue time; absent on records written by other tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_time: Option<String>,
    /// Issue year; absent on records written by other tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// When the record was last written by this system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Decodes a stored document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Malformed`] if a required field is missing
    /// or `createdAt` is not an RFC 3339 timestamp.
    pub fn from_document(document: Document) -> Result<Self, DocumentError> {
        let Document { id, mut fields } = document;
        let mut required = |name: &str| {
            fields.remove(name).ok_or_else(|| {
                DocumentError::Malformed(format!("certificate {id} has no {name} field"))
            })
        };
        let holder_name = required(HOLDER_NAME)?;
        let event = required(EVENT)?;
        let issue_date = required(ISSUE_DATE)?;

        let created_at = fields
            .remove(CREATED_AT)
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw).map(|t| t.with_timezone(&Utc)).map_err(|e| {
                    DocumentError::Malformed(format!(
                        "certificate {id} has invalid {CREATED_AT} {raw:?}: {e}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            holder_name,
            event,
            issue_date,
            issue_time: fields.remove(ISSUE_TIME),
            year: fields.remove(YEAR),
            created_at,
            id,
        })
    }
}

/// Caller-supplied data for creating a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCertificate {
    /// Name of the holder. Required.
    pub holder_name: String,
    /// Event or reason. Required.
    pub event: String,
    /// Issue date, `YYYY-MM-DD`. Required.
    pub issue_date: String,
    /// Issue time; defaults to [`DEFAULT_ISSUE_TIME`].
    pub issue_time: Option<String>,
    /// Issue year; defaults to the current calendar year.
    pub year: Option<String>,
}

impl NewCertificate {
    /// Creates certificate data from the required fields.
    #[must_use]
    pub fn new(
        holder_name: impl Into<String>,
        event: impl Into<String>,
        issue_date: impl Into<String>,
    ) -> Self {
        Self {
            holder_name: holder_name.into(),
            event: event.into(),
            issue_date: issue_date.into(),
            issue_time: None,
            year: None,
        }
    }

    /// Sets the issue time.
    #[must_use]
    pub fn with_issue_time(mut self, issue_time: impl Into<String>) -> Self {
        self.issue_time = Some(issue_time.into());
        self
    }

    /// Sets the issue year.
    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Checks that the ID and every required field are non-blank.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every missing field.
    pub fn validate(&self, id: &str) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("id", id),
            (HOLDER_NAME, self.holder_name.as_str()),
            (EVENT, self.event.as_str()),
            (ISSUE_DATE, self.issue_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Issue time if one was given; blank counts as omitted.
    #[must_use]
    pub fn issue_time(&self) -> Option<&str> {
        non_blank(self.issue_time.as_deref())
    }

    /// Issue year if one was given; blank counts as omitted.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        non_blank(self.year.as_deref())
    }

    /// The fields this data writes, without defaults or timestamps.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(HOLDER_NAME.to_string(), self.holder_name.clone());
        fields.insert(EVENT.to_string(), self.event.clone());
        fields.insert(ISSUE_DATE.to_string(), self.issue_date.clone());
        if let Some(issue_time) = self.issue_time() {
            fields.insert(ISSUE_TIME.to_string(), issue_time.to_string());
        }
        if let Some(year) = self.year() {
            fields.insert(YEAR.to_string(), year.to_string());
        }
        fields
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Required certificate data was missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Names of the missing fields, in declaration order.
    pub missing: Vec<&'static str>,
}
