// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for the `tq search` command: full-text search over comment bodies.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn tq() -> Command {
    cargo_bin_cmd!("tq")
}

fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    tq().arg("init").current_dir(temp.path()).assert().success();
    temp
}

fn days_ago(days: i64) -> String {
    (chrono::Utc::now() - chrono::Duration::days(days)).to_rfc3339()
}

/// A ticket whose thread mentions a refund twice: once from the requester,
/// once in the agent reply.
fn bundle(id: i64, subject: &str) -> Value {
    let when = days_ago(1);
    json!({
        "ticket": {
            "id": id,
            "status": "solved",
            "subject": subject,
            "created_at": when,
            "updated_at": when,
            "requester_id": 9001,
            "assignee_id": 42
        },
        "users": [
            {"id": 9001, "email": "sam@example.com", "name": "Sam", "groups": []},
            {"id": 42, "email": "maya@acme.com", "name": "Maya", "groups": ["Tier 1"]}
        ],
        "comments": [
            {"author_id": 9001, "created_at": when, "public": true,
             "body": format!("Please refund me, {} happened twice", subject)},
            {"author_id": 42, "created_at": when, "public": true,
             "body": "So sorry, refund issued"}
        ]
    })
}

fn ingest(temp: &TempDir, bundles: &[Value]) {
    let lines: Vec<String> = bundles.iter().map(Value::to_string).collect();
    std::fs::write(temp.path().join("dump.jsonl"), lines.join("\n")).unwrap();
    tq().arg("ingest")
        .arg("dump.jsonl")
        .current_dir(temp.path())
        .assert()
        .success();
}

fn stdout_of(cmd: &mut Command, temp: &TempDir) -> String {
    let output = cmd.current_dir(temp.path()).output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

// =============================================================================
// Hits, highlighting, and subject lookup
// =============================================================================

#[test]
fn search_finds_comment_text() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal")]);

    tq().arg("search")
        .arg("refund")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4521#"))
        .stdout(predicate::str::contains("[refund]"))
        .stdout(predicate::str::contains("Double charge on renewal"));
}

#[test]
fn search_requires_all_terms_in_one_comment() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal")]);

    // Only the agent reply contains both words.
    tq().arg("search")
        .arg("refund")
        .arg("issued")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4521#1"))
        .stdout(predicate::str::contains("4521#0").not());
}

#[test]
fn search_no_matches_prints_nothing() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal")]);

    tq().arg("search")
        .arg("zebra")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn search_limit_reports_remaining_hits() {
    let temp = init_temp();
    ingest(
        &temp,
        &[
            bundle(101, "Charge one"),
            bundle(102, "Charge two"),
            bundle(103, "Charge three"),
        ],
    );

    // Six matching comments across three tickets, two shown.
    let stdout = stdout_of(tq().arg("search").arg("refund").arg("-n").arg("2"), &temp);
    assert_eq!(stdout.lines().count(), 3, "two hits plus the more line: {stdout}");
    assert!(stdout.contains("... 4 more"), "missing more line: {stdout}");
}

// =============================================================================
// Output formats
// =============================================================================

#[test]
fn search_output_id_dedups_tickets() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal")]);

    // Both comments match but the ticket is listed once.
    let stdout = stdout_of(tq().arg("search").arg("refund").arg("-o").arg("id"), &temp);
    similar_asserts::assert_eq!(stdout, "4521\n");
}

#[test]
fn search_output_json_carries_query_and_hits() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal")]);

    let stdout = stdout_of(tq().arg("search").arg("refund").arg("-o").arg("json"), &temp);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(parsed["query"], "refund");
    let hits = parsed["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["ticket_id"], 4521);
    assert_eq!(hits[0]["subject"], "Double charge on renewal");
    assert!(hits[0]["snippet"].as_str().unwrap().contains("[refund]"));
}

// =============================================================================
// Argument validation
// =============================================================================

#[test]
fn search_without_terms_shows_usage() {
    let temp = init_temp();

    tq().arg("search")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn search_rejects_empty_term() {
    let temp = init_temp();

    tq().arg("search")
        .arg("")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn search_fails_outside_an_archive() {
    let temp = TempDir::new().unwrap();

    tq().arg("search")
        .arg("refund")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized: run 'tq init' first"));
}
