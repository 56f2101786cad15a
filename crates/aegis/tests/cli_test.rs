//! Integration tests for the `aegis` binary.
//!
//! Argument parsing, config handling and endpoint output, all without a
//! live ServiceNow or SolarWinds instance.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `aegis` binary with env isolation.
///
/// Clears every variable the deployment reads and points config
/// directories at a nonexistent path so tests never touch real settings.
fn aegis_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("aegis");
    cmd.env("HOME", "/tmp/aegis-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/aegis-cli-test-nonexistent")
        .env_remove("AEGIS_CONFIG")
        .env_remove("AEGIS_LISTEN")
        .env_remove("AEGIS_TIMEOUT_SECS")
        .env_remove("AEGIS_SETTINGS_FILE")
        .env_remove("DEMO_MODE")
        .env_remove("ENABLE_MANAGEMENT")
        .env_remove("SOLARWINDS_UI_BASE")
        .env_remove("SOLARWINDS_EXCLUDE_CAPTIONS")
        .env_remove("SOLARWINDS_USERNAME")
        .env_remove("SOLARWINDS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a deployment config whose settings file holds `settings`.
fn write_config(dir: &Path, settings: &str) -> std::path::PathBuf {
    let settings_path = dir.join("settings.toml");
    std::fs::write(&settings_path, settings).unwrap();
    let config_path = dir.join("config.toml");
    std::fs::write(
        &config_path,
        format!("settings_file = {:?}\n", settings_path.display().to_string()),
    )
    .unwrap();
    config_path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = aegis_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in output:\n{stderr}");
}

#[test]
fn test_help_flag() {
    aegis_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("fetch"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    aegis_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aegis"));
}

#[test]
fn test_unknown_endpoint_is_usage_error() {
    aegis_cmd()
        .args(["fetch", "weather"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// ── Fetch ───────────────────────────────────────────────────────────

#[test]
fn test_demo_vendors() {
    aegis_cmd()
        .args(["--demo", "fetch", "vendors"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"GitHub\"").and(predicate::str::contains("\"Degraded\"")),
        );
}

#[test]
fn test_unconfigured_tickets_print_empty_list() {
    aegis_cmd()
        .args(["fetch", "tickets", "-o", "json-compact"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_client_config() {
    aegis_cmd()
        .args(["fetch", "client-config", "-o", "json-compact"])
        .env("ENABLE_MANAGEMENT", "true")
        .assert()
        .success()
        .stdout("{\"enableManagement\":true}\n");
}

#[test]
fn test_missing_credentials_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[solarwinds]\nenabled = true\napiUrl = \"https://orion.invalid:17774\"\n",
    );

    aegis_cmd()
        .arg("--config")
        .arg(&config)
        .args(["fetch", "alerts"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("SolarWinds credentials are not set."));
}

#[test]
fn test_settings_file_demo_flag_wins_over_cli() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "DEMO_MODE = \"false\"\n");

    aegis_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--demo", "fetch", "outage-history", "-o", "json-compact"])
        .assert()
        .success()
        .stdout("[]\n");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_reports_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    aegis_cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(config.display().to_string()).and(
                predicate::str::contains(dir.path().join("settings.toml").display().to_string()),
            ),
        );
}

#[test]
fn test_config_show_defaults() {
    aegis_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("listen = \"127.0.0.1:8787\"")
                .and(predicate::str::contains("timeout_secs = 30")),
        );
}

#[test]
fn test_invalid_listen_is_config_error() {
    aegis_cmd()
        .args(["config", "show"])
        .env("AEGIS_LISTEN", "nowhere")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("listen"));
}
