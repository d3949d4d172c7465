//! Errors returned by the certificate store.

use thiserror::Error;

use crate::certificate::ValidationError;
use crate::ports::DocumentError;

/// Failure of a certificate store operation.
///
/// Not-found is not represented here; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The caller supplied insufficient data. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The document store failed, denied the request, or returned bad data.
    #[error("certificate store error: {0}")]
    Store(#[from] DocumentError),
    /// A write reported success but the record could not be read back.
    #[error("certificate {id} was not found after writing it")]
    Integrity {
        /// ID of the certificate that went missing.
        id: String,
    },
}
