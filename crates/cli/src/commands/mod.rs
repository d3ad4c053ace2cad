// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod export;
pub mod filtering;
pub mod ingest;
pub mod init;
pub mod list;
pub mod rank;
pub mod reindex;
pub mod review;
pub mod search;
pub mod show;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use tq_core::Database;

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::Result;

/// Helper to open the archive from the current context.
pub fn open_db() -> Result<(Database, Config)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db = Database::open(&get_db_path(&work_dir))?;
    Ok((db, config))
}
