// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use tq_core::{score_ticket, Database, Reason, ScoreContext, Scored, Signals, Ticket};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;

use super::filtering::window_cutoff;
use super::open_db;

/// Default limit for ranked results in text output.
const DEFAULT_LIMIT: usize = 20;

/// JSON output schema for the rank command.
#[derive(Serialize)]
struct RankOutputJson<'a> {
    tickets: Vec<RankedJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    more: Option<usize>,
}

/// One ranked ticket in JSON output.
#[derive(Serialize)]
struct RankedJson<'a> {
    id: i64,
    status: &'a str,
    subject: &'a str,
    score: i64,
    reasons: &'a [Reason],
}

pub fn run(days: Option<i64>, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let (db, config) = open_db()?;
    run_impl(&db, &config, days, limit, format)
}

/// Internal implementation that accepts db/config for testing.
pub(crate) fn run_impl(
    db: &Database,
    config: &Config,
    days: Option<i64>,
    limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let ranked = rank_tickets(db, config, days)?;

    let effective_limit = limit.unwrap_or(DEFAULT_LIMIT);
    let total_count = ranked.len();
    let more_count = if total_count > effective_limit {
        Some(total_count - effective_limit)
    } else {
        None
    };

    match format {
        OutputFormat::Text => {
            for (ticket, scored) in ranked.iter().take(effective_limit) {
                println!("{}", format_ranked_line(ticket, scored));
            }
            if let Some(count) = more_count {
                println!("... {} more", count);
            }
        }
        OutputFormat::Json => {
            let output = RankOutputJson {
                tickets: ranked
                    .iter()
                    .take(effective_limit)
                    .map(|(ticket, scored)| RankedJson {
                        id: ticket.id,
                        status: ticket.status.as_str(),
                        subject: &ticket.subject,
                        score: scored.score,
                        reasons: &scored.reasons,
                    })
                    .collect(),
                limit,
                more: more_count,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Id => {
            for (ticket, _) in ranked.iter().take(effective_limit) {
                println!("{}", ticket.id);
            }
        }
    }

    Ok(())
}

/// Score every ticket in the window, highest first.
///
/// Ties keep the recency order the window query returns, so equal scores
/// list newest first.
pub(crate) fn rank_tickets(
    db: &Database,
    config: &Config,
    days: Option<i64>,
) -> Result<Vec<(Ticket, Scored)>> {
    let ctx = ScoreContext {
        sensitive_keywords: config.sensitive_keywords.clone(),
        easy_tags: config.easy_tags.clone(),
    };

    let tickets = db.recent_tickets(window_cutoff(days))?;
    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
    let mut threads = db.comments_for_many(&ids)?;

    let mut ranked = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        let comments = threads.remove(&ticket.id).unwrap_or_default();
        let audits = db.audits_for(ticket.id)?;
        let signals = Signals::derive(&ticket, &comments, &audits, &ctx);
        let scored = score_ticket(&ticket, &signals, &config.weights);
        ranked.push((ticket, scored));
    }

    ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score));
    Ok(ranked)
}

/// Format a single ranked line for text output.
fn format_ranked_line(ticket: &Ticket, scored: &Scored) -> String {
    let mut line = format!("- {} {}: {}", scored.score, ticket.id, ticket.subject);
    if !scored.reasons.is_empty() {
        let labels: Vec<&str> = scored.reasons.iter().map(Reason::as_str).collect();
        line.push_str(&format!(" ({})", labels.join(", ")));
    }
    line
}

#[cfg(test)]
#[path = "rank_tests.rs"]
mod tests;
