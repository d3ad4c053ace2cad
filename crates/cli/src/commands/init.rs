// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use tq_core::Database;

use crate::config::{get_db_path, init_work_dir};
use crate::error::Result;

pub fn run(subdomain: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let work_dir = init_work_dir(&target_path, subdomain.as_deref())?;

    // Create the database (and its schema) up front so the archive is
    // usable immediately.
    let db = Database::open(&get_db_path(&work_dir))?;
    let count = db.count_tickets()?;

    println!("Initialized ticket archive at {}", work_dir.display());
    if let Some(sub) = subdomain {
        println!("Subdomain: {}", sub);
    }
    if count > 0 {
        println!("Tickets: {}", count);
    }

    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
