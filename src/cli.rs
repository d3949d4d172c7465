//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::admin;

/// Top-level CLI parser for `certify`.
#[derive(Debug, Parser)]
#[command(name = "certify", version, about = "Issue and verify certificates")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Commands that work against the certificate store.
    #[command(flatten)]
    Certificate(CertificateCommand),
    /// Read a password from stdin and print its stored credential form.
    HashPassword {
        /// PBKDF2 iteration count to record in the credential.
        #[arg(long, default_value_t = admin::DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
        iterations: u32,
    },
}

/// Subcommands that need a configured backend.
#[derive(Debug, Subcommand)]
pub enum CertificateCommand {
    /// Print a fresh certificate ID.
    GenerateId,
    /// Look up a certificate by its ID.
    Verify {
        /// Certificate ID, e.g. `24-ABC123`.
        id: String,
        /// Print the record as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },
    /// Find certificates by exact ID or holder-name prefix.
    Search {
        /// Certificate ID or the start of a holder name (case-sensitive).
        query: String,
        /// Print the records as a JSON array instead of cards.
        #[arg(long)]
        json: bool,
    },
    /// Issue a certificate (requires the admin password).
    Issue(IssueArgs),
    /// Issue the demonstration certificate (requires the admin password).
    SeedSample,
}

/// Arguments for `certify issue`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct IssueArgs {
    /// Name of the certificate holder.
    #[arg(long)]
    pub holder_name: String,
    /// Event or reason for issuance.
    #[arg(long)]
    pub event: String,
    /// Issue date, `YYYY-MM-DD`.
    #[arg(long)]
    pub issue_date: String,
    /// Issue time; defaults to 12:00.
    #[arg(long)]
    pub issue_time: Option<String>,
    /// Issue year; defaults to the current year.
    #[arg(long)]
    pub year: Option<String>,
    /// Use this ID instead of generating one.
    #[arg(long)]
    pub id: Option<String>,
}
