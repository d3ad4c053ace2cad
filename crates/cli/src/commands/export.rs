// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{self, BufWriter, Write};

use serde::Serialize;
use tq_core::{AuditTrail, Comment, Database, Review, Ticket};

use crate::error::{Error, Result};

use super::filtering::window_cutoff;
use super::open_db;

/// One archived ticket with everything recorded about it. Also the JSON
/// shape `tq show -o json` prints.
#[derive(Serialize)]
pub(crate) struct ExportedTicket {
    #[serde(flatten)]
    pub(crate) ticket: Ticket,
    pub(crate) comments: Vec<Comment>,
    pub(crate) audits: Vec<AuditTrail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) review: Option<Review>,
}

pub fn run(out: Option<&str>, days: Option<i64>) -> Result<()> {
    let (db, _) = open_db()?;
    run_impl(&db, out, days)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(db: &Database, out: Option<&str>, days: Option<i64>) -> Result<()> {
    let tickets = match days {
        Some(_) => db.recent_tickets(window_cutoff(days))?,
        None => db.all_tickets()?,
    };

    match out {
        Some(path) => {
            if path.trim().is_empty() {
                return Err(Error::ExportPathEmpty);
            }
            let file = File::create(path)?;
            let count = write_tickets(db, tickets, BufWriter::new(file))?;
            println!("Exported {} tickets to {}", count, path);
        }
        None => {
            let stdout = io::stdout();
            write_tickets(db, tickets, stdout.lock())?;
        }
    }

    Ok(())
}

/// Write one JSON object per line; returns how many were written.
fn write_tickets<W: Write>(db: &Database, tickets: Vec<Ticket>, mut writer: W) -> Result<usize> {
    let mut count = 0;
    for ticket in tickets {
        let id = ticket.id;
        let exported = ExportedTicket {
            ticket,
            comments: db.comments_for(id)?,
            audits: db.audits_for(id)?,
            review: db.get_review(id)?,
        };
        writeln!(writer, "{}", serde_json::to_string(&exported)?)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
