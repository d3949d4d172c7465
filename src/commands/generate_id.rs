//! `certify generate-id` command.

use std::io::Write;

use super::write_failed;
use crate::store::CertificateStore;

/// Execute the `generate-id` command.
///
/// # Errors
///
/// Returns an error string if writing to `out` fails.
pub fn run(store: &CertificateStore<'_>, out: &mut impl Write) -> Result<(), String> {
    writeln!(out, "{}", store.generate_id()).map_err(write_failed)
}
