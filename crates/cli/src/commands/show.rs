// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tq_core::Database;

use crate::cli::OutputFormat;
use crate::colors;
use crate::config::Config;
use crate::display::format_ticket_details;
use crate::error::Result;

use super::export::ExportedTicket;
use super::open_db;

pub fn run(id: i64, keywords: &[String], format: &OutputFormat) -> Result<()> {
    let (db, config) = open_db()?;
    run_impl(&db, &config, id, keywords, format)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(
    db: &Database,
    config: &Config,
    id: i64,
    keywords: &[String],
    format: &OutputFormat,
) -> Result<()> {
    let ticket = db.get_ticket(id)?;
    let comments = db.comments_for(id)?;
    let audits = db.audits_for(id)?;
    let review = db.get_review(id)?;

    match format {
        OutputFormat::Text => {
            let details = format_ticket_details(
                &ticket,
                &comments,
                &audits,
                review.as_ref(),
                config.agent_url(id).as_deref(),
                keywords,
                colors::should_colorize(),
            );
            println!("{}", details);
        }
        OutputFormat::Json => {
            let bundle = ExportedTicket {
                ticket,
                comments,
                audits,
                review,
            };
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        OutputFormat::Id => {
            println!("{}", ticket.id);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
