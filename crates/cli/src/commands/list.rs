// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use tq_core::{Comment, Database, Ticket};

use crate::cli::{FilterArgs, OutputFormat};
use crate::config::Config;
use crate::display::format_ticket_line;
use crate::error::Result;

use super::filtering::{window_cutoff, TicketFilter};
use super::open_db;

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    tickets: Vec<&'a Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    days: Option<i64>,
    filters: &FilterArgs,
    status: Option<&str>,
    assignee: Option<&str>,
    bpo: Option<&str>,
    limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let (db, config) = open_db()?;
    run_impl(
        &db, &config, days, filters, status, assignee, bpo, limit, format,
    )
}

/// Internal implementation that accepts db for testing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_impl(
    db: &Database,
    config: &Config,
    days: Option<i64>,
    filters: &FilterArgs,
    status: Option<&str>,
    assignee: Option<&str>,
    bpo: Option<&str>,
    limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let filter = TicketFilter::parse(filters, status, assignee, bpo, config)?;
    let tickets = select_tickets(db, &filter, days, limit)?;

    match format {
        OutputFormat::Text => {
            for ticket in &tickets {
                println!("{}", format_ticket_line(ticket));
            }
        }
        OutputFormat::Json => {
            let output = ListOutputJson {
                tickets: tickets.iter().collect(),
                limit,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Id => {
            for ticket in &tickets {
                println!("{}", ticket.id);
            }
        }
    }

    Ok(())
}

/// Pull the window, apply the filter, and truncate. Tickets come back
/// newest first from the store, so no re-sort is needed.
pub(crate) fn select_tickets(
    db: &Database,
    filter: &TicketFilter,
    days: Option<i64>,
    limit: Option<usize>,
) -> Result<Vec<Ticket>> {
    let mut tickets = db.recent_tickets(window_cutoff(days))?;

    // Threads are only loaded when a keyword clause needs them.
    let threads = if filter.needs_comments() {
        let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
        Some(db.comments_for_many(&ids)?)
    } else {
        None
    };

    let mut kept = Vec::new();
    for ticket in tickets.drain(..) {
        let thread: &[Comment] = threads
            .as_ref()
            .and_then(|m| m.get(&ticket.id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if filter.matches(&ticket, thread)? {
            kept.push(ticket);
        }
    }

    if let Some(n) = limit {
        kept.truncate(n);
    }

    Ok(kept)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
