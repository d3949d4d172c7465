//! `certify issue` command.

use std::io::Write;

use super::{describe_error, write_failed};
use crate::certificate::NewCertificate;
use crate::cli::IssueArgs;
use crate::id;
use crate::store::CertificateStore;

/// Execute the `issue` command.
///
/// Uses `args.id` when given, otherwise a freshly generated ID. The caller
/// is responsible for the admin check.
///
/// # Errors
///
/// Returns an error string if validation, the write or its read-back fails.
pub async fn run(
    store: &CertificateStore<'_>,
    args: &IssueArgs,
    out: &mut impl Write,
) -> Result<(), String> {
    let id = match args.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            if !id::is_generated_shape(id) {
                tracing::info!(id, "issuing under a custom ID");
            }
            id.to_string()
        }
        _ => store.generate_id(),
    };
    let data = NewCertificate {
        holder_name: args.holder_name.trim().to_string(),
        event: args.event.trim().to_string(),
        issue_date: args.issue_date.trim().to_string(),
        issue_time: args.issue_time.clone(),
        year: args.year.clone(),
    };

    let certificate = store.create(&id, &data).await.map_err(|e| describe_error(&e))?;
    writeln!(out, "Certificate created successfully with ID: {}", certificate.id)
        .map_err(write_failed)
}
