// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for the offline commands

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::{setup_config, CONFIG};
use predicates::prelude::*;

fn rk() -> Command {
    Command::cargo_bin("rk").unwrap()
}

#[test]
fn test_rk_help() {
    rk().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rk keeps rooms"));
}

#[test]
fn test_rk_version() {
    rk().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rk"));
}

#[test]
fn test_check_lists_rooms() {
    let (_temp, path) = setup_config(CONFIG);

    rk().arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("office"))
        .stdout(predicate::str::contains("Office"))
        .stdout(predicate::str::contains("2 room(s) ok"));
}

#[test]
fn test_check_rejects_malformed_rule() {
    let (_temp, path) = setup_config(
        r#"
[rooms.office]
actors = ["trv-office"]
schedule = [{ start = "25:00", v = 21 }]
"#,
    );

    rk().arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn test_check_rejects_missing_file() {
    rk().args(["check", "/nonexistent/rk.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/rk.toml"));
}

#[test]
fn test_times_prints_boundaries() {
    let (_temp, path) = setup_config(CONFIG);

    rk().arg("times")
        .arg(&path)
        .args(["--room", "office"])
        .assert()
        .success()
        .stdout(predicate::str::contains("office: 06:00 22:00"))
        .stdout(predicate::str::contains("hall").not());
}

#[test]
fn test_resolve_at_a_given_time() {
    let (_temp, path) = setup_config(CONFIG);

    rk().arg("resolve")
        .arg(&path)
        .args(["--room", "office", "--at", "2026-10-14T07:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("21"))
        .stdout(predicate::str::contains("(day)"));

    rk().arg("resolve")
        .arg(&path)
        .args(["--room", "office", "--at", "2026-10-14 23:15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("16"))
        .stdout(predicate::str::contains("(night)"));
}

#[test]
fn test_resolve_json_output() {
    let (_temp, path) = setup_config(CONFIG);

    let output = rk()
        .arg("resolve")
        .arg(&path)
        .args(["--at", "2026-10-14T12:00", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    // Rooms are ordered by id
    assert_eq!(results[0]["room"], "hall");
    assert_eq!(results[0]["value"], 17);
    assert_eq!(results[1]["room"], "office");
    assert_eq!(results[1]["outcome"], "resolved");
    assert_eq!(results[1]["value"], 21);
    assert_eq!(results[1]["rule"], "day");
}

#[test]
fn test_resolve_rejects_unknown_room() {
    let (_temp, path) = setup_config(CONFIG);

    rk().arg("resolve")
        .arg(&path)
        .args(["--room", "cellar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown room: cellar"));
}

#[test]
fn test_resolve_rejects_bad_time() {
    let (_temp, path) = setup_config(CONFIG);

    rk().arg("resolve")
        .arg(&path)
        .args(["--at", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}
