//! Integration tests for the `ufanet` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling -- all without touching the live Ufanet API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `ufanet` binary with env isolation.
///
/// Points HOME/XDG at a nonexistent path and clears `UFANET_*` env vars
/// so tests never touch the user's real configuration.
fn ufanet_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ufanet");
    cmd.env("HOME", "/tmp/ufanet-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ufanet-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/ufanet-cli-test-nonexistent")
        .env_remove("UFANET_CONTRACT")
        .env_remove("UFANET_BASE_URL")
        .env_remove("UFANET_OUTPUT")
        .env_remove("UFANET_TIMEOUT")
        .env_remove("UFANET_PASSWORD");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ufanet_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    ufanet_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("intercoms")
            .and(predicate::str::contains("cameras"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    ufanet_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ufanet"));
}

#[test]
fn test_unknown_subcommand_fails() {
    ufanet_cmd().arg("frobnicate").assert().failure();
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_intercoms_open_requires_id() {
    let output = ufanet_cmd().args(["intercoms", "open"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_intercoms_open_rejects_non_numeric_id() {
    let output = ufanet_cmd()
        .args(["intercoms", "open", "front-door"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Missing configuration ───────────────────────────────────────────

#[test]
fn test_list_without_contract_reports_usage_error() {
    let output = ufanet_cmd().args(["intercoms", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("contract"),
        "Expected a contract hint in output:\n{text}"
    );
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_without_config() {
    ufanet_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    ufanet_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    ufanet_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ufanet"));
}
