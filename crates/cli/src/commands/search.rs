// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tq_core::{CommentHit, Database};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::open_db;

/// Default limit for search results in text output.
const DEFAULT_LIMIT: usize = 25;

/// JSON output schema for the search command.
#[derive(Serialize)]
struct SearchOutputJson<'a> {
    query: &'a str,
    hits: Vec<HitJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    more: Option<usize>,
}

/// One search hit in JSON output, with the ticket subject joined in.
#[derive(Serialize)]
struct HitJson<'a> {
    ticket_id: i64,
    idx: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_email: Option<&'a str>,
    subject: &'a str,
    snippet: &'a str,
}

pub fn run(query: &[String], limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let (db, _) = open_db()?;
    run_impl(&db, query, limit, format)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(
    db: &Database,
    query: &[String],
    limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let query = query.join(" ");
    let effective_limit = limit.unwrap_or(DEFAULT_LIMIT);
    let (hits, more_count) = collect_hits(db, &query, effective_limit)?;

    // One subject lookup per distinct ticket; hits often cluster.
    let mut subjects: HashMap<i64, String> = HashMap::new();
    for hit in &hits {
        if !subjects.contains_key(&hit.ticket_id) {
            let ticket = db.get_ticket(hit.ticket_id)?;
            subjects.insert(hit.ticket_id, ticket.subject);
        }
    }

    match format {
        OutputFormat::Text => {
            for hit in &hits {
                let subject = subjects
                    .get(&hit.ticket_id)
                    .map(String::as_str)
                    .unwrap_or("");
                println!("{}", format_hit_line(hit, subject));
            }
            if let Some(count) = more_count {
                println!("... {} more", count);
            }
        }
        OutputFormat::Json => {
            let output = SearchOutputJson {
                query: &query,
                hits: hits
                    .iter()
                    .map(|hit| HitJson {
                        ticket_id: hit.ticket_id,
                        idx: hit.idx,
                        author_email: hit.author_email.as_deref(),
                        subject: subjects
                            .get(&hit.ticket_id)
                            .map(String::as_str)
                            .unwrap_or(""),
                        snippet: &hit.snippet,
                    })
                    .collect(),
                limit,
                more: more_count,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Id => {
            for id in hit_ticket_ids(&hits) {
                println!("{}", id);
            }
        }
    }

    Ok(())
}

/// Fetch matches best-first, truncated to `limit`, with the count of
/// results beyond the cut.
pub(crate) fn collect_hits(
    db: &Database,
    query: &str,
    limit: usize,
) -> Result<(Vec<CommentHit>, Option<usize>)> {
    let mut hits = db.search_comments(query, usize::MAX)?;
    let total_count = hits.len();
    let more_count = if total_count > limit {
        Some(total_count - limit)
    } else {
        None
    };
    hits.truncate(limit);
    Ok((hits, more_count))
}

/// Ticket ids in hit order, deduplicated across comments of one ticket.
pub(crate) fn hit_ticket_ids(hits: &[CommentHit]) -> Vec<i64> {
    let mut seen = HashSet::new();
    hits.iter()
        .map(|h| h.ticket_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Format a single hit line for text output.
fn format_hit_line(hit: &CommentHit, subject: &str) -> String {
    let mut line = format!("- {}#{}", hit.ticket_id, hit.idx);
    if let Some(author) = &hit.author_email {
        line.push_str(&format!(" (@{})", author));
    }
    line.push_str(&format!(" {}: {}", subject, hit.snippet));
    line
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
