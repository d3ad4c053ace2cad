// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tq reindex` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn reindex_reports_the_archive_size() {
    let temp = init_with_sample();

    tq().arg("reindex")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rebuilt search index (1 tickets)"));
}

#[test]
fn search_still_works_after_a_rebuild() {
    let temp = init_with_sample();

    tq().arg("reindex")
        .current_dir(temp.path())
        .assert()
        .success();

    tq().args(["search", "refund"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4521"));
}

#[test]
fn reindex_on_an_empty_archive() {
    let temp = init_temp();

    tq().arg("reindex")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rebuilt search index (0 tickets)"));
}
