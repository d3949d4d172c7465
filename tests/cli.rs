//! Integration tests for top-level CLI behavior.
//!
//! Each test runs the binary in its own scratch directory against the local
//! file backend, with the environment cleared so a developer's `.env` or
//! Firestore settings never leak in.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("certify_cli_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn certify(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_certify"));
    cmd.current_dir(dir)
        .env_clear()
        .env("CERTIFY_LOCAL_STORE", dir.join("store.json"))
        .stdin(Stdio::null());
    cmd
}

fn run(cmd: &mut Command, args: &[&str]) -> Output {
    cmd.args(args).output().expect("failed to run certify binary")
}

fn run_with_stdin(cmd: &mut Command, args: &[&str], stdin: &str) -> Output {
    let mut child = cmd
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn certify binary");
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

/// Credential for password `hunter2`, produced by the binary itself.
fn credential(dir: &Path) -> String {
    let output = run_with_stdin(&mut certify(dir), &["hash-password", "--iterations", "1000"], "hunter2\n");
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn admin(dir: &Path) -> Command {
    let credential = credential(dir);
    let mut cmd = certify(dir);
    cmd.env("CERTIFY_ADMIN_CREDENTIAL", credential).env("CERTIFY_ADMIN_PASSWORD", "hunter2");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn generate_id_prints_year_prefixed_id() {
    let dir = scratch("generate_id");
    let output = run(&mut certify(&dir), &["generate-id"]);
    let id = stdout(&output);
    let id = id.trim();

    assert!(output.status.success());
    assert_eq!(id.len(), 9, "{id}");
    assert_eq!(&id[2..3], "-");
    assert!(id[..2].chars().all(|c| c.is_ascii_digit()));
    assert!(id[3..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn issue_then_verify_and_search() {
    let dir = scratch("issue_verify");
    let output = run(
        &mut admin(&dir),
        &[
            "issue",
            "--holder-name",
            "Jane Doe",
            "--event",
            "Workshop",
            "--issue-date",
            "2024-05-01",
            "--id",
            "24-ABC123",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Certificate created successfully with ID: 24-ABC123\n");

    let output = run(&mut certify(&dir), &["verify", "24-ABC123"]);
    let card = stdout(&output);
    assert!(output.status.success());
    assert!(card.contains("Holder Name:    Jane Doe"));
    assert!(card.contains("Issue Date:     May 1, 2024"));
    assert!(card.contains("Issue Time:     12:00"));
    assert!(card.contains("Verified Certificate"));

    let output = run(&mut certify(&dir), &["search", "Jane"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Certificate ID: 24-ABC123"));

    let output = run(&mut certify(&dir), &["search", "Bob"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "No certificates found\n");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn issue_reads_password_from_stdin() {
    let dir = scratch("issue_stdin");
    let credential = credential(&dir);
    let mut cmd = certify(&dir);
    cmd.env("CERTIFY_ADMIN_CREDENTIAL", credential);

    let output = run_with_stdin(
        &mut cmd,
        &["issue", "--holder-name", "Jane", "--event", "Talk", "--issue-date", "2024-01-02"],
        "hunter2\n",
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("Certificate created successfully with ID: "));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn issue_with_wrong_password_is_refused() {
    let dir = scratch("issue_wrong_password");
    let mut cmd = admin(&dir);
    cmd.env("CERTIFY_ADMIN_PASSWORD", "hunter3");

    let output = run(
        &mut cmd,
        &["issue", "--holder-name", "Jane", "--event", "Talk", "--issue-date", "2024-01-02"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid credentials. Please try again."));
    assert!(!dir.join("store.json").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn issue_without_configured_credential_is_refused() {
    let dir = scratch("issue_unconfigured");
    let mut cmd = certify(&dir);
    cmd.env("CERTIFY_ADMIN_PASSWORD", "hunter2");

    let output = run(&mut cmd, &["seed-sample"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("CERTIFY_ADMIN_CREDENTIAL"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn issue_with_blank_field_reports_missing_fields() {
    let dir = scratch("issue_blank");
    let output = run(
        &mut admin(&dir),
        &["issue", "--holder-name", " ", "--event", "Talk", "--issue-date", "2024-01-02"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please fill in all required fields: holderName"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn seed_sample_is_searchable() {
    let dir = scratch("seed_sample");
    let output = run(&mut admin(&dir), &["seed-sample"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = run(&mut certify(&dir), &["search", "John", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["event"], "Web Development Workshop");
    assert_eq!(value[0]["issueTime"], "14:30");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn verify_unknown_id_exits_with_error() {
    let dir = scratch("verify_unknown");
    let output = run(&mut certify(&dir), &["verify", "24-NOPE00"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Certificate with ID 24-NOPE00 not found"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn search_with_blank_query_exits_with_error() {
    let dir = scratch("search_blank");
    let output = run(&mut certify(&dir), &["search", "   "]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please enter a certificate ID or name"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recording_writes_cassettes() {
    let dir = scratch("recording");
    let mut cmd = certify(&dir);
    cmd.env("CERTIFY_RECORD", dir.join("cassettes"));

    let output = run(&mut cmd, &["verify", "24-NOPE00"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Recording saved to:"));
    let session = std::fs::read_dir(dir.join("cassettes")).unwrap().next().unwrap().unwrap().path();
    assert!(session.join("documents.cassette.yaml").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_backend_is_a_configuration_error() {
    let dir = scratch("unknown_backend");
    let mut cmd = certify(&dir);
    cmd.env("CERTIFY_BACKEND", "postgres");

    let output = run(&mut cmd, &["verify", "24-ABC123"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown CERTIFY_BACKEND"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn hash_password_ignores_incomplete_backend_config() {
    let dir = scratch("hash_password_firestore");
    let mut cmd = certify(&dir);
    cmd.env("CERTIFY_BACKEND", "firestore");

    let output = run_with_stdin(&mut cmd, &["hash-password", "--iterations", "1000"], "hunter2\n");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("pbkdf2-sha256$1000$"));

    let output = run(&mut certify(&dir).env("CERTIFY_BACKEND", "firestore"), &["generate-id"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("FIRESTORE_PROJECT_ID must be set"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn hash_password_salts_each_run() {
    let dir = scratch("hash_password_salts");
    assert_ne!(credential(&dir), credential(&dir));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn help_exits_successfully() {
    let dir = scratch("help");
    let output = run(&mut certify(&dir), &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("issue"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = scratch("invalid");
    let output = run(&mut certify(&dir), &["nonsense"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unrecognized subcommand"));
    let _ = std::fs::remove_dir_all(&dir);
}
