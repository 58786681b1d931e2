//! Basic binary invocation tests (assert_cmd).

mod common;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn drivekit_cmd() -> Command {
    cargo_bin_cmd!("drivekit")
}

#[test]
fn test_binary_exists() {
    let _cmd = drivekit_cmd();
}

#[test]
fn test_cli_version() {
    let mut cmd = drivekit_cmd();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("drivekit"));
}

#[test]
fn test_cli_help() {
    let mut cmd = drivekit_cmd();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Back up shop files"));
}

#[test]
fn test_cli_no_args_shows_error() {
    let mut cmd = drivekit_cmd();
    cmd.assert().failure();
}

#[test]
fn test_cli_help_subcommand() {
    let mut cmd = drivekit_cmd();
    cmd.arg("help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("auth url"));
}

#[test]
fn test_cli_help_filter() {
    let mut cmd = drivekit_cmd();
    cmd.args(["help", "upload"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("upload FILE"));
}

#[test]
fn test_cli_upload_requires_file_arg() {
    let mut cmd = drivekit_cmd();
    cmd.arg("upload");
    cmd.assert().failure();
}

#[test]
fn test_cli_upload_missing_file_fails() {
    let (tmp, config) = common::temp_project();
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"])
        .arg(&config)
        .arg("upload")
        .arg(tmp.path().join("nope.sql.gz"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_cli_auth_url_without_credentials_fails() {
    let (_tmp, config) = common::temp_project();
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["auth", "url"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("credentials.json"));
}

#[test]
fn test_cli_auth_url_rejects_unknown_redirect() {
    let mut cmd = drivekit_cmd();
    cmd.args(["auth", "url", "--redirect", "popup"]);
    cmd.assert().failure();
}

#[test]
fn test_cli_auth_status_without_token() {
    let (_tmp, config) = common::temp_project();
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["auth", "status"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No token cached"));
}

#[test]
fn test_cli_auth_status_with_valid_token() {
    let (tmp, config) = common::temp_project();
    common::write_token(tmp.path(), 3600, true);
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["auth", "status"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("refresh:  available"));
}

#[test]
fn test_cli_check_db_without_url_fails() {
    let (_tmp, config) = common::temp_project();
    let mut cmd = drivekit_cmd();
    cmd.env_remove("DATABASE_URL");
    cmd.args(["--config"]).arg(&config).args(["check", "db"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No database URL configured"));
}

#[test]
fn test_cli_sync_copies_and_reports() {
    let (tmp, config) = common::temp_project();
    let source = tmp.path().join("backend").join("uploads");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(source.join("toy.jpg"), b"jpeg").unwrap();

    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).arg("sync");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("copied:  1"));
    assert!(tmp.path().join("uploads").join("toy.jpg").exists());

    // second pass copies nothing
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).arg("sync");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("skipped: 1"));
}

#[test]
fn test_cli_sync_missing_source_fails() {
    let (_tmp, config) = common::temp_project();
    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).arg("sync");
    cmd.assert().failure();
}
