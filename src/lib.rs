//! Core library entry for the `certify` CLI.
//!
//! Certificates are issued under short IDs of the form `YY-XXXXXX` and
//! kept in a document store (Firestore or a local JSON file). Anyone can
//! verify a certificate by ID or search by holder name; issuing requires
//! the admin password.

pub mod adapters;
pub mod admin;
pub mod cassette;
pub mod certificate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod id;
pub mod ports;
pub mod render;
pub mod store;
pub mod telemetry;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command).await
}
