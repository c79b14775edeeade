//! Integration tests for the non-interactive CLI surface.
//!
//! These run the built binary and assert on exit codes and output; no
//! remote server and no TTY are required.

use assert_cmd::Command;
use predicates::prelude::*;

fn trawl() -> Command {
    let mut cmd = Command::cargo_bin("trawl").unwrap();
    // Keep host configuration out of the tests.
    cmd.env_remove("TRAWL_REMOTE_URL")
        .env_remove("TRAWL_TOKEN")
        .env_remove("TRAWL_CONFIG")
        .env("TRAWL_LOG_LEVEL", "error");
    cmd
}

#[test]
fn no_interactive_prints_help_and_exits() {
    trawl()
        .arg("--no-interactive")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn help_flag_works() {
    trawl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("interactive shell"));
}

#[test]
fn version_flag_works() {
    trawl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trawl"));
}

#[test]
fn completions_generate() {
    trawl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trawl"));
}

#[test]
fn unknown_flag_is_usage_error() {
    trawl().arg("--definitely-not-a-flag").assert().failure();
}

#[test]
fn query_requires_a_query() {
    trawl().arg("query").assert().failure();
}

#[test]
fn remote_failure_maps_to_remote_exit_code() {
    // Port 1 refuses connections; the remote error exit code is 7.
    trawl()
        .args(["--remote-url", "http://127.0.0.1:1", "macros", "list"])
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn missing_remote_is_a_config_error() {
    // No remote configured anywhere: exit code 5 with a pointer to the
    // config.
    trawl()
        .args(["--config", "/nonexistent/trawl.toml", "macros", "list"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("No remote configured"));
}

#[test]
fn list_output_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("macros.json");

    // The remote is unreachable, so the command fails before writing;
    // this asserts the failure path leaves no partial file behind.
    trawl()
        .args([
            "--remote-url",
            "http://127.0.0.1:1",
            "macros",
            "list",
            "--out",
        ])
        .arg(&out)
        .assert()
        .failure();
    assert!(!out.exists());
}
