// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for the `tq list` command: windows, filters, and output formats.

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

/// A solved, billing-tagged ticket assigned to Maya with a neutral thread.
/// Tests mutate the returned value to vary status, tags, or users.
fn bundle(id: i64, subject: &str, updated_days_ago: i64) -> Value {
    let when = days_ago(updated_days_ago);
    json!({
        "ticket": {
            "id": id,
            "status": "solved",
            "subject": subject,
            "created_at": when,
            "updated_at": when,
            "requester_id": 9001,
            "assignee_id": 42,
            "tags": ["billing"]
        },
        "users": [
            {"id": 9001, "email": "sam@example.com", "name": "Sam", "groups": []},
            {"id": 42, "email": "maya@acme.com", "name": "Maya", "groups": ["Tier 1"]}
        ],
        "comments": [
            {"author_id": 9001, "created_at": when, "public": true,
             "body": "Something looks off on my account"},
            {"author_id": 42, "created_at": when, "public": true,
             "body": "Looked into this, all set now"}
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
// Basics: empty archive, ingested tickets, uninitialized directory
// =============================================================================

#[test]
fn list_empty_archive_prints_nothing() {
    let temp = init_temp();

    tq().arg("list")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn list_shows_ingested_tickets() {
    let temp = init_temp();
    ingest(
        &temp,
        &[
            bundle(4521, "Double charge on renewal", 1),
            bundle(4522, "Login loops forever", 2),
        ],
    );

    tq().arg("list")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[solved]"))
        .stdout(predicate::str::contains("Double charge on renewal"))
        .stdout(predicate::str::contains("Login loops forever"));
}

#[test]
fn list_fails_outside_an_archive() {
    let temp = TempDir::new().unwrap();

    tq().arg("list")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized: run 'tq init' first"));
}

// =============================================================================
// Window: default five days, widened with --days
// =============================================================================

#[test]
fn list_default_window_hides_old_tickets() {
    let temp = init_temp();
    ingest(
        &temp,
        &[bundle(101, "Fresh ticket", 1), bundle(102, "Stale ticket", 30)],
    );

    tq().arg("list")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fresh ticket"))
        .stdout(predicate::str::contains("Stale ticket").not());

    tq().arg("list")
        .arg("--days")
        .arg("60")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fresh ticket"))
        .stdout(predicate::str::contains("Stale ticket"));
}

// =============================================================================
// Keyword filters: subjects, comment bodies, match modes
// =============================================================================

#[test]
fn list_keyword_filters_by_subject() {
    let temp = init_temp();
    ingest(
        &temp,
        &[
            bundle(201, "Refund gone missing", 1),
            bundle(202, "Login loops forever", 1),
        ],
    );

    tq().arg("list")
        .arg("-k")
        .arg("refund")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Refund gone missing"))
        .stdout(predicate::str::contains("Login loops forever").not());

    tq().arg("list")
        .arg("-k")
        .arg("zebra")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn list_keyword_matches_comment_bodies() {
    let temp = init_temp();
    let mut noisy = bundle(211, "Follow up", 1);
    noisy["comments"][0]["body"] = json!("The card was charged twice this month");
    ingest(&temp, &[noisy, bundle(212, "Quiet one", 1)]);

    tq().arg("list")
        .arg("-k")
        .arg("charged")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Follow up"))
        .stdout(predicate::str::contains("Quiet one").not());
}

#[test]
fn list_match_all_requires_every_keyword() {
    let temp = init_temp();
    ingest(
        &temp,
        &[
            bundle(221, "Refund for broken invoice", 1),
            bundle(222, "Refund status question", 1),
        ],
    );

    tq().arg("list")
        .arg("-k")
        .arg("refund")
        .arg("-k")
        .arg("invoice")
        .arg("--match")
        .arg("all")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Refund for broken invoice"))
        .stdout(predicate::str::contains("Refund status question").not());
}

#[test]
fn list_match_regex_matches_patterns() {
    let temp = init_temp();
    ingest(&temp, &[bundle(231, "Refund gone missing", 1)]);

    tq().arg("list")
        .arg("-k")
        .arg("ref+und")
        .arg("--match")
        .arg("regex")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Refund gone missing"));
}

#[test]
fn list_match_regex_rejects_invalid_pattern() {
    let temp = init_temp();
    ingest(&temp, &[bundle(232, "Refund gone missing", 1)]);

    tq().arg("list")
        .arg("-k")
        .arg("ref(und")
        .arg("--match")
        .arg("regex")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid search pattern"));
}

#[test]
fn list_rejects_unknown_match_mode() {
    let temp = init_temp();

    tq().arg("list")
        .arg("-k")
        .arg("refund")
        .arg("--match")
        .arg("fuzzy")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid match mode"));
}

// =============================================================================
// Status filter
// =============================================================================

#[test]
fn list_status_filters_by_status() {
    let temp = init_temp();
    let mut open = bundle(302, "Still waiting", 1);
    open["ticket"]["status"] = json!("open");
    ingest(&temp, &[bundle(301, "All sorted", 1), open]);

    tq().arg("list")
        .arg("--status")
        .arg("solved")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All sorted"))
        .stdout(predicate::str::contains("Still waiting").not());

    tq().arg("list")
        .arg("-s")
        .arg("open")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Still waiting"))
        .stdout(predicate::str::contains("All sorted").not());
}

#[test]
fn list_rejects_unknown_status() {
    let temp = init_temp();

    tq().arg("list")
        .arg("--status")
        .arg("resolved")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ticket status"));
}

// =============================================================================
// Assignee filter
// =============================================================================

#[test]
fn list_assignee_filter_is_case_insensitive() {
    let temp = init_temp();
    let mut other = bundle(402, "Rex ticket", 1);
    other["ticket"]["assignee_id"] = json!(43);
    other["users"] = json!([
        {"id": 9001, "email": "sam@example.com", "name": "Sam", "groups": []},
        {"id": 43, "email": "rex@acme.com", "name": "Rex", "groups": []}
    ]);
    ingest(&temp, &[bundle(401, "Maya ticket", 1), other]);

    for flag_value in ["maya@acme.com", "MAYA@ACME.COM"] {
        tq().arg("list")
            .arg("-a")
            .arg(flag_value)
            .current_dir(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Maya ticket"))
            .stdout(predicate::str::contains("Rex ticket").not());
    }
}

// =============================================================================
// Tag filters: include, comma lists, exclude, config defaults
// =============================================================================

#[test]
fn list_tag_filters_by_tag() {
    let temp = init_temp();
    let mut spam = bundle(502, "Spam ticket", 1);
    spam["ticket"]["tags"] = json!(["spam"]);
    ingest(&temp, &[bundle(501, "Billing issue", 1), spam]);

    tq().arg("list")
        .arg("-t")
        .arg("billing")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Billing issue"))
        .stdout(predicate::str::contains("Spam ticket").not());

    // Comma-separated tags combine as OR.
    tq().arg("list")
        .arg("-t")
        .arg("billing,spam")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Billing issue"))
        .stdout(predicate::str::contains("Spam ticket"));
}

#[test]
fn list_exclude_tag_drops_tagged_tickets() {
    let temp = init_temp();
    let mut spam = bundle(512, "Spam ticket", 1);
    spam["ticket"]["tags"] = json!(["spam"]);
    ingest(&temp, &[bundle(511, "Billing issue", 1), spam]);

    tq().arg("list")
        .arg("--exclude-tag")
        .arg("spam")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Billing issue"))
        .stdout(predicate::str::contains("Spam ticket").not());
}

#[test]
fn list_config_excluded_tags_hide_by_default() {
    let temp = init_temp();
    let mut spam = bundle(522, "Spam ticket", 1);
    spam["ticket"]["tags"] = json!(["spam"]);
    ingest(&temp, &[bundle(521, "Billing issue", 1), spam]);

    std::fs::write(
        temp.path().join(".tq").join("config.toml"),
        "excluded_tags = [\"spam\"]\n",
    )
    .unwrap();

    tq().arg("list")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Billing issue"))
        .stdout(predicate::str::contains("Spam ticket").not());
}

// =============================================================================
// BPO filter
// =============================================================================

#[test]
fn list_bpo_filters_by_partner() {
    let temp = init_temp();
    let mut outsourced = bundle(601, "ICX handled", 1);
    outsourced["users"][1]["groups"] = json!(["ICX Tier 2"]);
    ingest(&temp, &[outsourced, bundle(602, "In house", 1)]);

    tq().arg("list")
        .arg("--bpo")
        .arg("icx")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ICX handled"))
        .stdout(predicate::str::contains("In house").not());
}

#[test]
fn list_rejects_unknown_bpo() {
    let temp = init_temp();

    tq().arg("list")
        .arg("--bpo")
        .arg("acme")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid bpo"));
}

// =============================================================================
// Limit and output formats
// =============================================================================

#[test]
fn list_limit_keeps_newest_tickets() {
    let temp = init_temp();
    ingest(
        &temp,
        &[
            bundle(111, "First", 3),
            bundle(112, "Second", 2),
            bundle(113, "Third", 1),
        ],
    );

    let stdout = stdout_of(tq().arg("list").arg("-n").arg("2").arg("-o").arg("id"), &temp);
    similar_asserts::assert_eq!(stdout, "113\n112\n");
}

#[test]
fn list_output_id_prints_bare_ids() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal", 1)]);

    let stdout = stdout_of(tq().arg("list").arg("-o").arg("id"), &temp);
    similar_asserts::assert_eq!(stdout, "4521\n");
}

#[test]
fn list_output_json_carries_ticket_fields() {
    let temp = init_temp();
    ingest(&temp, &[bundle(4521, "Double charge on renewal", 1)]);

    let stdout = stdout_of(tq().arg("list").arg("-o").arg("json"), &temp);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();

    let tickets = parsed["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["id"], 4521);
    assert_eq!(tickets[0]["subject"], "Double charge on renewal");
    assert_eq!(tickets[0]["status"], "solved");
    assert!(parsed.get("limit").is_none());
}
