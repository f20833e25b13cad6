//! CLI contract tests for the `co` binary.
//!
//! Covers the exit-code/message contract spec'd for the driver: a
//! missing filename, a non-`.co` extension, an unreadable path, a
//! program that fails one of the three compile-time passes, and a
//! clean run.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn co_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_co"))
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write fixture source");
    path
}

#[test]
fn missing_filename_prints_usage_and_exits_1() {
    Command::new(co_bin())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: co"));
}

#[test]
fn a_non_co_extension_is_rejected() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = write_source(&dir, "program.txt", "println(\"hi\");");

    Command::new(co_bin())
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: File must be a .co file."));
}

#[test]
fn a_missing_file_is_reported() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("absent.co");

    Command::new(co_bin())
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found or could not be opened"));
}

#[test]
fn a_semantic_error_is_reported_and_exits_1() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = write_source(&dir, "undefined.co", "println(missing);");

    Command::new(co_bin())
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("SemanticError"));
}

#[test]
fn a_runtime_error_is_reported_and_exits_1() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = write_source(&dir, "divzero.co", "var(int) x = 1 / 0;");

    Command::new(co_bin())
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("InterpreterError"));
}

#[test]
fn a_well_formed_program_runs_and_exits_0() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = write_source(&dir, "hello.co", "println(\"hello from co\");");

    Command::new(co_bin())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from co"));
}

#[test]
fn version_flag_reports_the_crate_version() {
    Command::new(co_bin())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
