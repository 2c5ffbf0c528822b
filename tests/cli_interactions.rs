//! CLI behavior tests
//!
//! Only paths that need no outside network: argument errors, help and
//! version output, and IPv4 literals that resolve to themselves.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn edgestat() -> Command {
    let mut cmd = Command::cargo_bin("edgestat").unwrap();
    for var in [
        "EDGESTAT_TARGET",
        "EDGESTAT_PORT",
        "EDGESTAT_THREADS",
        "EDGESTAT_INSECURE",
        "EDGESTAT_ENABLE_COLOR",
        "EDGESTAT_REFRESH_MS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    edgestat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("request"))
        .stdout(predicate::str::contains("edges"));
}

#[test]
fn test_request_help_lists_flags() {
    edgestat()
        .args(["request", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--thread"))
        .stdout(predicate::str::contains("--dashboard"))
        .stdout(predicate::str::contains("--insecure"));
}

#[test]
fn test_version() {
    edgestat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unsupported_scheme_exits_with_config_code() {
    edgestat()
        .args(["--no-color", "request", "ftp://files.example.com/a.bin"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PROTOCOL"));
}

#[test]
fn test_port_zero_rejected() {
    edgestat()
        .args(["request", "http://www.example.com/", "-p", "0"])
        .assert()
        .failure();
}

#[test]
fn test_conflicting_color_flags() {
    edgestat()
        .args(["--color", "--no-color", "edges", "www.example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--no-color"));
}

#[test]
fn test_invalid_env_value() {
    edgestat()
        .env("EDGESTAT_THREADS", "many")
        .args(["--no-color", "request", "http://www.example.com/"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("EDGESTAT_THREADS"));
}

#[test]
fn test_edges_of_ipv4_literal() {
    edgestat()
        .args(["--no-color", "edges", "127.0.0.1"])
        .assert()
        .success()
        .stdout(predicate::str::diff("127.0.0.1\n"));
}

#[test]
fn test_env_writes_example_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("example.env");

    edgestat()
        .args(["env", "--write-example"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("EDGESTAT_REFRESH_MS"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("# EDGESTAT_THREADS=4"));
}
