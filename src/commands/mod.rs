//! Command dispatch and handlers.

pub mod generate_id;
pub mod hash_password;
pub mod issue;
pub mod search;
pub mod seed_sample;
pub mod verify;

use std::env;
use std::io::{self, BufRead};

use crate::admin::{AdminGate, AuthError};
use crate::cassette::session::RecordingSession;
use crate::cli::{CertificateCommand, Command};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::store::{CertificateError, CertificateStore};
use crate::telemetry;

/// Dispatch a parsed command to its handler.
///
/// `hash-password` runs before any configuration is loaded, so it works
/// even when the backend settings are incomplete. Every other command loads
/// the configuration and builds a service context. When `CERTIFY_RECORD`
/// is set to a directory path, all port interactions are recorded to
/// per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub async fn dispatch(command: &Command) -> Result<(), String> {
    let command = match command {
        Command::HashPassword { iterations } => {
            return hash_password::run(*iterations, &mut io::stdin().lock(), &mut io::stdout());
        }
        Command::Certificate(command) => command,
    };

    let config = Config::from_env().map_err(|e| e.to_string())?;
    telemetry::init(&config.log);

    let (ctx, session) = if let Some(dir) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(&config.backend, dir)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config.backend)?, None)
    };

    let result = dispatch_with_context(command, &ctx, &config).await;

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a certificate command with the given service context.
async fn dispatch_with_context(
    command: &CertificateCommand,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    let store = CertificateStore::new(ctx, config.collection.as_str());
    let mut out = io::stdout();
    match command {
        CertificateCommand::GenerateId => generate_id::run(&store, &mut out),
        CertificateCommand::Verify { id, json } => verify::run(&store, id, *json, &mut out).await,
        CertificateCommand::Search { query, json } => {
            search::run(&store, query, *json, &mut out).await
        }
        CertificateCommand::Issue(args) => {
            authorize(config)?;
            issue::run(&store, args, &mut out).await
        }
        CertificateCommand::SeedSample => {
            authorize(config)?;
            seed_sample::run(&store, &mut out).await
        }
    }
}

/// Checks the admin password from `CERTIFY_ADMIN_PASSWORD` or stdin.
fn authorize(config: &Config) -> Result<(), String> {
    let gate = AdminGate::from_credential(config.admin_credential.as_deref());
    let password = match env::var("CERTIFY_ADMIN_PASSWORD") {
        Ok(password) => password,
        Err(_) => read_password(&mut io::stdin().lock())?,
    };
    gate.verify(&password).map_err(|e| describe_auth_error(&e))
}

/// Reads the first line of `input` as a password.
pub(crate) fn read_password(input: &mut impl BufRead) -> Result<String, String> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(|e| format!("Failed to read password: {e}"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Maps a store error to the message shown to the user.
pub(crate) fn describe_error(err: &CertificateError) -> String {
    match err {
        CertificateError::Validation(e) => {
            format!("Please fill in all required fields: {}", e.missing.join(", "))
        }
        CertificateError::Store(_) => {
            "Failed to reach the certificate store. Please try again.".to_string()
        }
        CertificateError::Integrity { id } => format!("Certificate {id} was not persisted"),
    }
}

fn describe_auth_error(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials => "Invalid credentials. Please try again.".to_string(),
        other => format!("Admin access unavailable: {other}"),
    }
}

pub(crate) fn write_failed(err: io::Error) -> String {
    format!("Failed to write output: {err}")
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
