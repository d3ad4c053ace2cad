// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tq init` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn creates_tq_directory() {
    let temp = TempDir::new().unwrap();

    tq().arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized ticket archive"));

    assert!(temp.path().join(".tq").exists());
    assert!(temp.path().join(".tq/config.toml").exists());
    assert!(temp.path().join(".tq/tickets.db").exists());
}

#[test]
fn records_subdomain_in_config() {
    let temp = TempDir::new().unwrap();

    tq().arg("init")
        .arg("--subdomain")
        .arg("acme")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Subdomain: acme"));

    let config = std::fs::read_to_string(temp.path().join(".tq/config.toml")).unwrap();
    assert!(config.contains("subdomain = \"acme\""));
}

#[test]
fn rejects_empty_subdomain() {
    let temp = TempDir::new().unwrap();

    tq().arg("init")
        .arg("--subdomain")
        .arg("  ")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn reinit_is_not_an_error() {
    let temp = init_temp();

    tq().arg("init").current_dir(temp.path()).assert().success();
}

#[test]
fn reinit_updates_subdomain_and_keeps_archive() {
    let temp = init_with_sample();

    tq().arg("init")
        .arg("--subdomain")
        .arg("acme")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tickets: 1"));

    let config = std::fs::read_to_string(temp.path().join(".tq/config.toml")).unwrap();
    assert!(config.contains("subdomain = \"acme\""));

    // The ingested ticket survived the re-init.
    tq().arg("show")
        .arg("4521")
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
fn path_option_initializes_elsewhere() {
    let temp = TempDir::new().unwrap();

    tq().arg("init")
        .arg("--path")
        .arg("archive")
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("archive/.tq/config.toml").exists());
    assert!(!temp.path().join(".tq").exists());
}

#[test]
fn creates_gitignore_covering_the_database() {
    let temp = init_temp();

    let gitignore = std::fs::read_to_string(temp.path().join(".tq/.gitignore")).unwrap();
    assert!(gitignore.contains("tickets.db"));
    assert!(gitignore.contains("tickets.db-wal"));
    assert!(gitignore.contains("tickets.db-shm"));
}

#[test]
fn default_config_documents_every_setting() {
    let temp = init_temp();

    let config = std::fs::read_to_string(temp.path().join(".tq/config.toml")).unwrap();
    assert!(config.contains("# subdomain"));
    assert!(config.contains("bot_emails"));
    assert!(config.contains("excluded_tags"));
    assert!(config.contains("sensitive_keywords"));
}
