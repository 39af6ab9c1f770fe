//! Smoke tests to verify command wiring and startup exit codes

use assert_cmd::Command;
use predicates::prelude::*;

fn roster() -> Command {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    for key in ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME", "RUST_LOG"] {
        cmd.env_remove(key);
    }
    cmd
}

// === Help Tests ===

#[test]
fn test_serve_help() {
    roster()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("--db-host"));
}

#[test]
fn test_check_db_help() {
    roster()
        .arg("check-db")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection attempts before giving up"));
}

#[test]
fn test_zero_retries_rejected() {
    roster()
        .args(["check-db", "--retries", "0"])
        .assert()
        .failure();
}

// === Startup Failure Tests ===

#[test]
fn test_check_db_without_config_fails() {
    roster()
        .args(["check-db", "--retries", "1", "--retry-delay-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not ready"));
}

#[test]
fn test_serve_unreachable_database_exits_nonzero() {
    roster()
        .args([
            "serve",
            "--bind",
            "127.0.0.1:0",
            "--db-host",
            "127.0.0.1",
            "--db-port",
            "1",
            "--db-user",
            "roster",
            "--db-name",
            "roster",
            "--retries",
            "2",
            "--retry-delay-ms",
            "10",
            "--connect-timeout-secs",
            "1",
        ])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server startup failed"));
}
