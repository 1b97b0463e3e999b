//! Integration tests for the agnx binary: flags, exit codes, and error
//! reporting. None of these start a listener.

#![allow(clippy::unwrap_used, deprecated)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn agnx() -> Command {
    Command::cargo_bin("agnx").unwrap()
}

#[test]
fn test_version_flag_prints_build_metadata() {
    agnx()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("agnx "))
        .stdout(predicate::str::contains("(commit "))
        .stdout(predicate::str::contains("(rustc "));
}

#[test]
fn test_single_dash_version_flag_prints_build_metadata() {
    agnx()
        .arg("-version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("agnx "));
}

#[test]
fn test_single_dash_port_flag_is_accepted() {
    // `-port 9000` parses; the bad config path then fails the load step.
    agnx()
        .args(["-port", "9000", "-config", "/definitely/not/here.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: load config:"));
}

#[test]
fn test_version_flag_skips_config_loading() {
    agnx()
        .args(["--version", "--config", "/definitely/not/here.yaml"])
        .assert()
        .success();
}

#[test]
fn test_missing_config_file_exits_one() {
    agnx()
        .args(["--config", "/definitely/not/here.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: load config: failed to read config file"));
}

#[test]
fn test_invalid_config_file_exits_one() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "server: [").unwrap();

    agnx()
        .arg("--config")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config YAML"));
}

#[test]
fn test_invalid_port_exits_one() {
    agnx().args(["--port", "0"]).assert().code(1);
}

#[test]
fn test_help_exits_zero() {
    agnx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--port"));
}
