//! `certify verify` command.

use std::io::Write;

use super::{describe_error, write_failed};
use crate::render;
use crate::store::CertificateStore;

/// Execute the `verify` command.
///
/// Prints the certificate card (or JSON record) for `id`.
///
/// # Errors
///
/// Returns an error string if the certificate does not exist or the store
/// fails.
pub async fn run(
    store: &CertificateStore<'_>,
    id: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let id = id.trim();
    let certificate = store
        .fetch_by_id(id)
        .await
        .map_err(|e| describe_error(&e))?
        .ok_or_else(|| format!("Certificate with ID {id} not found"))?;

    if json {
        let body = serde_json::to_string_pretty(&certificate)
            .map_err(|e| format!("Failed to encode certificate: {e}"))?;
        writeln!(out, "{body}").map_err(write_failed)
    } else {
        write!(out, "{}", render::card(&certificate)).map_err(write_failed)
    }
}
