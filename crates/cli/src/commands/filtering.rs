// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket filter parsing and matching.
//!
//! This module provides the shared filtering logic used by the list command:
//! window cutoffs, tag include/exclude sets, and keyword matching over
//! ticket text.

use chrono::{DateTime, Duration, Utc};
use tq_core::{Bpo, Comment, MatchMode, Ticket, TicketStatus};

use crate::cli::FilterArgs;
use crate::config::Config;
use crate::error::Result;

/// Days of history shown when no --days is given.
pub(crate) const DEFAULT_WINDOW_DAYS: i64 = 5;

/// Returns the updated_at cutoff for a window of the given number of days.
pub(crate) fn window_cutoff(days: Option<i64>) -> DateTime<Utc> {
    Utc::now() - Duration::days(days.unwrap_or(DEFAULT_WINDOW_DAYS))
}

/// Subject plus public comment bodies, the text keyword filters run against.
pub(crate) fn searchable_text(ticket: &Ticket, comments: &[Comment]) -> String {
    let mut text = ticket.subject.clone();
    for comment in comments.iter().filter(|c| c.public) {
        text.push('\n');
        text.push_str(&comment.body);
    }
    text
}

/// Parsed in-memory filter applied to each ticket in the window.
#[derive(Debug)]
pub(crate) struct TicketFilter {
    /// Ticket must carry at least one of these tags.
    tags: Vec<String>,
    /// Ticket must carry none of these tags (config excludes merged in).
    exclude_tags: Vec<String>,
    /// Ticket text must match these keywords under `mode`.
    keywords: Vec<String>,
    /// Ticket text must not match any of these.
    exclude_keywords: Vec<String>,
    mode: MatchMode,
    status: Option<TicketStatus>,
    assignee: Option<String>,
    bpo: Option<Bpo>,
}

impl TicketFilter {
    /// Build a filter from CLI arguments, merging the config's default
    /// tag excludes. Parse failures in status/bpo/mode surface as errors.
    pub(crate) fn parse(
        filters: &FilterArgs,
        status: Option<&str>,
        assignee: Option<&str>,
        bpo: Option<&str>,
        config: &Config,
    ) -> Result<Self> {
        let mut exclude_tags = config.excluded_tags.clone();
        exclude_tags.extend(filters.exclude_tag.iter().cloned());

        Ok(TicketFilter {
            tags: filters.tag.clone(),
            exclude_tags,
            keywords: filters.keyword.clone(),
            exclude_keywords: filters.exclude_keyword.clone(),
            mode: filters.match_mode.parse::<MatchMode>()?,
            status: status.map(str::parse).transpose()?,
            assignee: assignee.map(|a| a.to_lowercase()),
            bpo: bpo.map(str::parse).transpose()?,
        })
    }

    /// True when matching needs the ticket's comment thread loaded.
    pub(crate) fn needs_comments(&self) -> bool {
        !self.keywords.is_empty() || !self.exclude_keywords.is_empty()
    }

    /// Check one ticket against every clause. Regex keywords can fail
    /// to compile, so matching is fallible.
    pub(crate) fn matches(&self, ticket: &Ticket, comments: &[Comment]) -> Result<bool> {
        if let Some(status) = self.status {
            if ticket.status != status {
                return Ok(false);
            }
        }
        if let Some(assignee) = &self.assignee {
            if ticket.assignee_email.as_deref() != Some(assignee.as_str()) {
                return Ok(false);
            }
        }
        if let Some(bpo) = self.bpo {
            if ticket.bpo != Some(bpo) {
                return Ok(false);
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| ticket.tags.contains(t)) {
            return Ok(false);
        }
        if ticket.tags.iter().any(|t| self.exclude_tags.contains(t)) {
            return Ok(false);
        }

        if self.needs_comments() {
            let text = searchable_text(ticket, comments);
            if !self.keywords.is_empty()
                && !tq_core::text::matches(&text, &self.keywords, self.mode)?
            {
                return Ok(false);
            }
            if !self.exclude_keywords.is_empty()
                && tq_core::text::matches(&text, &self.exclude_keywords, MatchMode::Any)?
            {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
#[path = "filtering_tests.rs"]
mod tests;
