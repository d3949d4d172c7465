//! `certify search` command.

use std::io::Write;

use super::{describe_error, write_failed};
use crate::render;
use crate::store::CertificateStore;

/// Execute the `search` command.
///
/// The query is trimmed, then matched as an exact ID or holder-name prefix.
///
/// # Errors
///
/// Returns an error string for an empty query or a store failure.
pub async fn run(
    store: &CertificateStore<'_>,
    query: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Please enter a certificate ID or name".to_string());
    }
    let results = store.search(query).await.map_err(|e| describe_error(&e))?;

    if json {
        let body = serde_json::to_string_pretty(&results)
            .map_err(|e| format!("Failed to encode certificates: {e}"))?;
        return writeln!(out, "{body}").map_err(write_failed);
    }
    if results.is_empty() {
        return writeln!(out, "No certificates found").map_err(write_failed);
    }
    for (i, certificate) in results.iter().enumerate() {
        if i > 0 {
            writeln!(out).map_err(write_failed)?;
        }
        write!(out, "{}", render::card(certificate)).map_err(write_failed)?;
    }
    Ok(())
}
