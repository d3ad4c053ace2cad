// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tq_core::Database;

use crate::error::Result;

use super::open_db;

pub fn run() -> Result<()> {
    let (db, _) = open_db()?;
    run_impl(&db)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(db: &Database) -> Result<()> {
    db.rebuild_fts()?;
    let count = db.count_tickets()?;
    println!("Rebuilt search index ({} tickets)", count);
    Ok(())
}

#[cfg(test)]
#[path = "reindex_tests.rs"]
mod tests;
