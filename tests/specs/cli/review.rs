// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tq review` command family.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[parameterized(
    pending = { "pending" },
    approved = { "approved" },
    rejected = { "rejected" },
)]
fn set_accepts_every_verdict(status: &str) {
    let temp = init_with_sample();

    tq().args(["review", "set", "4521", status])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Recorded {} for ticket 4521",
            status
        )));
}

#[test]
fn set_then_show_round_trips() {
    let temp = init_with_sample();

    tq().args([
        "review",
        "set",
        "4521",
        "approved",
        "--reviewer",
        "lead@acme.com",
        "--notes",
        "good tone throughout",
    ])
    .current_dir(temp.path())
    .assert()
    .success();

    tq().args(["review", "show", "4521"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket: 4521"))
        .stdout(predicate::str::contains("Status: approved"))
        .stdout(predicate::str::contains("Reviewer: lead@acme.com"))
        .stdout(predicate::str::contains("Notes: good tone throughout"));
}

#[test]
fn second_verdict_replaces_the_first() {
    let temp = init_with_sample();

    tq().args(["review", "set", "4521", "approved"])
        .current_dir(temp.path())
        .assert()
        .success();
    tq().args(["review", "set", "4521", "rejected", "--notes", "missed the tone"])
        .current_dir(temp.path())
        .assert()
        .success();

    tq().args(["review", "show", "4521"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: rejected"))
        .stdout(predicate::str::contains("Notes: missed the tone"));
}

#[test]
fn set_rejects_unknown_tickets() {
    let temp = init_temp();

    tq().args(["review", "set", "99", "approved"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ticket not found: 99"));
}

#[test]
fn set_rejects_unknown_verdicts() {
    let temp = init_with_sample();

    tq().args(["review", "set", "4521", "excellent"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid review status"))
        .stderr(predicate::str::contains("pending, approved, rejected"));
}

#[test]
fn show_without_a_verdict_says_so() {
    let temp = init_with_sample();

    tq().args(["review", "show", "4521"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no review recorded for ticket 4521"));
}

#[test]
fn list_filters_by_verdict() {
    let temp = init_temp();
    ingest_bundles(
        &temp,
        &[
            bundle(4521, "Double charge on renewal", 1),
            bundle_quiet(7001, "Printer jam", 1),
        ],
    );
    tq().args(["review", "set", "4521", "approved"])
        .current_dir(temp.path())
        .assert()
        .success();
    tq().args(["review", "set", "7001", "rejected"])
        .current_dir(temp.path())
        .assert()
        .success();

    tq().args(["review", "list", "--status", "approved"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4521"))
        .stdout(predicate::str::contains("7001").not());

    tq().args(["review", "list", "-o", "id"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4521"))
        .stdout(predicate::str::contains("7001"));
}

#[test]
fn list_text_lines_carry_reviewer_and_time() {
    let temp = init_with_sample();
    tq().args([
        "review",
        "set",
        "4521",
        "approved",
        "--reviewer",
        "lead@acme.com",
    ])
    .current_dir(temp.path())
    .assert()
    .success();

    tq().args(["review", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- [approved] 4521 by lead@acme.com at "));
}

#[test]
fn list_json_output_is_structured() {
    let temp = init_with_sample();
    tq().args(["review", "set", "4521", "pending"])
        .current_dir(temp.path())
        .assert()
        .success();

    let output = tq()
        .args(["review", "list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reviews = v["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["ticket_id"], 4521);
    assert_eq!(reviews[0]["status"], "pending");
}
