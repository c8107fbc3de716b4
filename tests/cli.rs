use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn cli_version() {
    Command::cargo_bin("thread-executor")
        .unwrap()
        .args(["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_default_run() {
    Command::cargo_bin("thread-executor")
        .unwrap()
        .assert()
        .success()
        .stdout(contains("sum=5050 failed=0"));
}

#[test]
fn cli_ten_threads() {
    Command::cargo_bin("thread-executor")
        .unwrap()
        .args(["--threads", "10", "--jobs", "100"])
        .assert()
        .success()
        .stdout(contains("sum=5050 failed=0"));
}

#[test]
fn cli_reports_failed_jobs() {
    // Jobs 0, 10, ..., 90 fail and contribute nothing to the sum.
    Command::cargo_bin("thread-executor")
        .unwrap()
        .args(["--threads", "3", "--jobs", "100", "--fail-every", "10"])
        .assert()
        .success()
        .stdout(contains("sum=4590 failed=10"));
}

#[test]
fn cli_zero_threads() {
    Command::cargo_bin("thread-executor")
        .unwrap()
        .args(["--threads", "0"])
        .assert()
        .failure();
}

#[test]
fn cli_invalid_flag() {
    Command::cargo_bin("thread-executor")
        .unwrap()
        .args(["--unknown"])
        .assert()
        .failure();
}
