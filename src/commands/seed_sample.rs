//! `certify seed-sample` command.

use std::io::Write;

use super::{describe_error, write_failed};
use crate::store::CertificateStore;

/// Execute the `seed-sample` command.
///
/// # Errors
///
/// Returns an error string if the sample certificate cannot be written.
pub async fn run(store: &CertificateStore<'_>, out: &mut impl Write) -> Result<(), String> {
    let certificate = store.seed_sample().await.map_err(|e| describe_error(&e))?;
    writeln!(out, "Sample certificate created with ID: {}", certificate.id).map_err(write_failed)
}
