// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tq_core::{text, AuditTrail, Comment, Review, Ticket};

use crate::colors;

/// Maximum line width for wrapped text content (excluding 4-space indent).
const WRAP_WIDTH: usize = 96;

/// Timestamp format for human-readable output.
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Wrap text at word boundaries if it's a single line.
///
/// - If content contains newlines: return as-is (preserve author formatting)
/// - If content is single line >width: wrap at word boundaries
/// - If content is single line <=width: return as-is
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') {
        return content.to_string();
    }

    if content.len() <= width {
        return content.to_string();
    }

    let mut result = String::new();
    let mut current_line = String::new();

    for word in content.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(&current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(&current_line);
    }

    result
}

/// Format a single ticket line for list output.
pub fn format_ticket_line(ticket: &Ticket) -> String {
    let mut meta = ticket.updated_at.format("%Y-%m-%d").to_string();
    if let Some(assignee) = &ticket.assignee_email {
        meta.push_str(&format!(", @{}", assignee));
    }
    if let Some(csat) = ticket.csat {
        meta.push_str(&format!(", csat {}", csat));
    }
    format!(
        "- [{}] ({}) {}: {}",
        ticket.status, meta, ticket.id, ticket.subject
    )
}

/// Format a single review line for review list output.
pub fn format_review_line(review: &Review) -> String {
    let mut line = format!("- [{}] {}", review.status, review.ticket_id);
    if let Some(reviewer) = &review.reviewer_email {
        line.push_str(&format!(" by {}", reviewer));
    }
    line.push_str(&format!(" at {}", review.updated_at.format(TIME_FORMAT)));
    line
}

/// Format ticket details for the show command.
pub fn format_ticket_details(
    ticket: &Ticket,
    comments: &[Comment],
    audits: &[AuditTrail],
    review: Option<&Review>,
    agent_url: Option<&str>,
    highlights: &[String],
    colorize: bool,
) -> String {
    let mut output = Vec::new();

    // Header: [status] id: subject
    output.push(format!(
        "[{}] {}: {}",
        ticket.status, ticket.id, ticket.subject
    ));

    if let Some(requester) = &ticket.requester_email {
        output.push(format!("Requester: {}", requester));
    }
    match (&ticket.assignee_name, &ticket.assignee_email) {
        (Some(name), Some(email)) => output.push(format!("Assignee: {} <{}>", name, email)),
        (Some(name), None) => output.push(format!("Assignee: {}", name)),
        (None, Some(email)) => output.push(format!("Assignee: {}", email)),
        (None, None) => {}
    }
    if let Some(bpo) = ticket.bpo {
        output.push(format!("BPO: {}", bpo));
    }
    output.push(format!(
        "Created: {}",
        ticket.created_at.format(TIME_FORMAT)
    ));
    output.push(format!(
        "Updated: {}",
        ticket.updated_at.format(TIME_FORMAT)
    ));
    if let Some(solved_at) = ticket.solved_at {
        output.push(format!("Solved: {}", solved_at.format(TIME_FORMAT)));
    }
    match ticket.csat {
        Some(score) => output.push(format!("CSAT: {}", score)),
        None if ticket.csat_offered => output.push("CSAT: offered, unrated".to_string()),
        None => {}
    }
    if let Some(tier) = &ticket.payer_tier {
        output.push(format!("Payer tier: {}", tier));
    }
    match (&ticket.topic, &ticket.sub_topic) {
        (Some(topic), Some(sub)) => output.push(format!("Topic: {} / {}", topic, sub)),
        (Some(topic), None) => output.push(format!("Topic: {}", topic)),
        (None, Some(sub)) => output.push(format!("Topic: - / {}", sub)),
        (None, None) => {}
    }
    if let Some(version) = &ticket.version {
        output.push(format!("Version: {}", version));
    }
    if let Some(language) = &ticket.language {
        output.push(format!("Language: {}", language));
    }
    if !ticket.tags.is_empty() {
        output.push(format!("Tags: {}", ticket.tags.join(", ")));
    }
    if let Some(url) = agent_url {
        output.push(format!("URL: {}", url));
    }

    let macro_lines: Vec<String> = audits
        .iter()
        .filter(|a| !a.macro_titles.is_empty())
        .map(|a| {
            format!(
                "  {}  {}",
                a.created_at.format(TIME_FORMAT),
                a.macro_titles.join(" | ")
            )
        })
        .collect();
    if !macro_lines.is_empty() {
        output.push(String::new());
        output.push("Macros:".to_string());
        output.extend(macro_lines);
    }

    if let Some(review) = review {
        output.push(String::new());
        output.push("Review:".to_string());
        let mut line = format!("  {}", review.status);
        if let Some(reviewer) = &review.reviewer_email {
            line.push_str(&format!(" by {}", reviewer));
        }
        line.push_str(&format!(" at {}", review.updated_at.format(TIME_FORMAT)));
        output.push(line);
        if let Some(notes) = &review.notes {
            for wrapped in wrap_text(notes, WRAP_WIDTH).lines() {
                output.push(format!("    {}", wrapped));
            }
        }
    }

    let public_count = comments.iter().filter(|c| c.public).count();
    output.push(String::new());
    output.push(format!(
        "Thread ({} comments, {} public):",
        comments.len(),
        public_count
    ));
    for comment in comments {
        output.extend(format_comment(comment, highlights, colorize));
    }

    output.join("\n")
}

/// Format a single comment with metadata line and indented body.
///
/// Output format:
/// ```text
///   #0 2026-08-10 14:02 user@example.com
///     Body goes here, potentially
///     wrapped across multiple lines.
/// ```
fn format_comment(comment: &Comment, highlights: &[String], colorize: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let author = comment
        .author_email
        .as_deref()
        .or(comment.author_name.as_deref())
        .unwrap_or("unknown");
    let visibility = if comment.public { "" } else { " (internal)" };
    lines.push(format!(
        "  #{} {} {}{}",
        comment.idx,
        comment.created_at.format(TIME_FORMAT),
        author,
        visibility
    ));

    let body = if highlights.is_empty() {
        comment.body.clone()
    } else if colorize {
        text::highlight(&comment.body, highlights, colors::BOLD, "\x1b[0m")
    } else {
        text::highlight(&comment.body, highlights, "[", "]")
    };

    let wrapped = wrap_text(&body, WRAP_WIDTH);
    for line in wrapped.lines() {
        lines.push(format!("    {}", line));
    }

    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
