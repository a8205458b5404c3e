//! End-to-end tests for commands that run without OCR models.

use assert_cmd::Command;
use predicates::prelude::*;

fn snscan() -> Command {
    Command::cargo_bin("snscan").unwrap()
}

/// A config file of defaults, so tests ignore any user-level config.
fn default_config(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn password_derives_from_valid_serial() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(&dir);
    snscan()
        .args(["--config", config.as_str(), "password", "--quiet", "PCABC123000012"])
        .assert()
        .success()
        .stdout("PC1476\n");
}

#[test]
fn password_uppercases_typed_serial() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(&dir);
    snscan()
        .args(["--config", config.as_str(), "password", "--quiet", "pcabc123000012"])
        .assert()
        .success()
        .stdout("PC1476\n");
}

#[test]
fn password_rejects_disallowed_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(&dir);
    snscan()
        .args(["--config", config.as_str(), "password", "XXABC123456789"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("disallowed prefix"));
}

#[test]
fn password_rejects_malformed_serial() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(&dir);
    snscan()
        .args(["--config", config.as_str(), "password", "PC123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed serial number"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("config.json");

    snscan()
        .args(["config", "init", "--output", output.to_str().unwrap()])
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("allowed_prefixes"));
    assert!(content.contains("PC"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("config.json");
    std::fs::write(&output, "{}").unwrap();

    snscan()
        .args(["config", "init", "--output", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn scan_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = default_config(&dir);
    snscan()
        .args(["--config", config.as_str(), "scan", "/nonexistent/label.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));
}
