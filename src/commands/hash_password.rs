//! `certify hash-password` command.

use std::io::{BufRead, Write};

use super::{read_password, write_failed};
use crate::admin;

/// Execute the `hash-password` command.
///
/// Reads the password from the first line of `input`, salts it with fresh
/// random bytes and prints the value to store in
/// `CERTIFY_ADMIN_CREDENTIAL`.
///
/// # Errors
///
/// Returns an error string for an empty password or a zero iteration count.
pub fn run(iterations: u32, input: &mut impl BufRead, out: &mut impl Write) -> Result<(), String> {
    if iterations == 0 {
        return Err("Iteration count must be at least 1".to_string());
    }
    let password = read_password(input)?;
    if password.is_empty() {
        return Err("Password must not be empty".to_string());
    }
    let credential = admin::hash_password(&password, &admin::generate_salt(), iterations);
    writeln!(out, "{credential}").map_err(write_failed)
}
