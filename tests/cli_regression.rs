// tests/cli_regression.rs
//
// Regression coverage for the tiny driver binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn tiny() -> Command {
    Command::cargo_bin("tiny").expect("tiny binary builds")
}

#[test]
fn test_eval_valid_program_prints_ast() {
    tiny()
        .args(["--eval", "x := 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assign"));
}

#[test]
fn test_eval_malformed_program_reports_and_fails() {
    tiny()
        .args(["--eval", "x := "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed 'assign'"));
}

#[test]
fn test_partial_ast_still_printed_on_recovered_errors() {
    tiny()
        .args(["--eval", "foo := \nok := 1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_no_input_is_usage_error() {
    tiny().assert().code(2);
}

#[test]
fn test_missing_file_is_io_error() {
    tiny()
        .arg("does-not-exist.tiny")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}
