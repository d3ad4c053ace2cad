// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tq_core::{csat_from, AuditTrail, Bpo, Comment, Database, Ticket};

use crate::config::Config;
use crate::error::{Error, Result};

use super::open_db;

// Helpdesk export bundle: one ticket dossier per JSONL line.
#[derive(Deserialize)]
struct Bundle {
    ticket: BundleTicket,
    #[serde(default)]
    users: Vec<BundleUser>,
    #[serde(default)]
    comments: Vec<BundleComment>,
    #[serde(default)]
    audits: Vec<BundleAudit>,
}

#[derive(Deserialize)]
struct BundleTicket {
    id: i64,
    status: String,
    #[serde(default)]
    subject: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    requester_id: Option<i64>,
    #[serde(default)]
    assignee_id: Option<i64>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    custom_fields: Vec<BundleCustomField>,
    #[serde(default)]
    satisfaction_rating: Option<SatisfactionRating>,
}

#[derive(Deserialize)]
struct BundleCustomField {
    id: i64,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct SatisfactionRating {
    #[serde(default)]
    score: Option<i64>,
}

#[derive(Deserialize)]
struct BundleUser {
    id: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    groups: Vec<String>,
}

#[derive(Deserialize)]
struct BundleComment {
    #[serde(default)]
    author_id: Option<i64>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_body: Option<String>,
}

#[derive(Deserialize)]
struct BundleAudit {
    #[serde(default)]
    events: Vec<BundleAuditEvent>,
}

#[derive(Deserialize)]
struct BundleAuditEvent {
    #[serde(rename = "type", default)]
    event_type: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    macro_title: Option<String>,
}

/// Why a parsed bundle was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Unassigned,
    BotAssignee,
    NoHumanReply,
}

/// A bundle converted to storable rows.
struct Prepared {
    ticket: Ticket,
    comments: Vec<Comment>,
    audit: Option<AuditTrail>,
}

/// Result of preparing one bundle.
enum Outcome {
    Ready(Box<Prepared>),
    Skipped(Skip),
}

// Ingest result tracking
#[derive(Default)]
struct IngestResult {
    ingested: usize,
    updated: usize,
    skipped_unassigned: usize,
    skipped_bot: usize,
    skipped_no_human_reply: usize,
    errors: Vec<String>,
}

impl IngestResult {
    fn skipped(&self) -> usize {
        self.skipped_unassigned + self.skipped_bot + self.skipped_no_human_reply
    }
}

/// Pull a custom field value by id, stringified the way the store keeps it.
fn extract_custom_field(fields: &[BundleCustomField], id: i64) -> Option<String> {
    fields
        .iter()
        .find(|f| f.id == id)
        .and_then(|f| f.value.as_ref())
        .and_then(|v| match v {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
}

/// A lowercased email, or None when missing or empty.
fn clean_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

/// Convert one bundle into rows, or decide to skip it.
///
/// Skip rules follow the original collector: unassigned tickets,
/// bot-assigned tickets, and tickets that never got a public reply from
/// a human agent are not worth reviewing.
fn prepare(bundle: Bundle, config: &Config) -> Result<Outcome> {
    let bt = bundle.ticket;

    let Some(assignee_id) = bt.assignee_id else {
        return Ok(Outcome::Skipped(Skip::Unassigned));
    };

    let users: HashMap<i64, &BundleUser> = bundle.users.iter().map(|u| (u.id, u)).collect();

    let requester_email = bt
        .requester_id
        .and_then(|id| users.get(&id))
        .and_then(|u| clean_email(u.email.as_deref()));

    let assignee = users.get(&assignee_id);
    let assignee_email = assignee.and_then(|u| clean_email(u.email.as_deref()));
    let assignee_name = assignee
        .and_then(|u| u.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    if let Some(email) = &assignee_email {
        if config.bot_emails.iter().any(|b| b.to_lowercase() == *email) {
            return Ok(Outcome::Skipped(Skip::BotAssignee));
        }
    }

    let mut comments = Vec::with_capacity(bundle.comments.len());
    let mut has_human_reply = false;
    for (idx, c) in bundle.comments.into_iter().enumerate() {
        let author = c.author_id.and_then(|id| users.get(&id));
        let author_email = author.and_then(|u| clean_email(u.email.as_deref()));
        let author_name = author.and_then(|u| u.name.clone());
        let body = c.body.or(c.html_body).unwrap_or_default();

        // A public reply from a human agent: authored by someone with an
        // email that is neither a bot's nor the requester's.
        if c.public {
            if let Some(email) = &author_email {
                let is_bot = config.bot_emails.iter().any(|b| b.to_lowercase() == *email);
                if !is_bot && Some(email) != requester_email.as_ref() {
                    has_human_reply = true;
                }
            }
        }

        comments.push(Comment {
            ticket_id: bt.id,
            idx: idx as i64,
            created_at: c.created_at,
            public: c.public,
            author_id: c.author_id,
            author_email,
            author_name,
            body,
        });
    }

    if !has_human_reply {
        return Ok(Outcome::Skipped(Skip::NoHumanReply));
    }

    let macro_titles: Vec<String> = bundle
        .audits
        .iter()
        .flat_map(|a| a.events.iter())
        .filter(|e| e.event_type.as_deref() == Some("ApplyMacro"))
        .filter_map(|e| e.value.clone().or_else(|| e.macro_title.clone()))
        .filter(|t| !t.is_empty())
        .collect();
    let audit = (!macro_titles.is_empty()).then(|| AuditTrail {
        ticket_id: bt.id,
        created_at: bt.updated_at,
        macro_titles,
    });

    let bpo = assignee
        .map(|u| u.groups.as_slice())
        .and_then(Bpo::from_group_names);

    let fields = &config.custom_fields;
    let mut ticket = Ticket::new(bt.id, bt.status.parse()?, bt.subject, bt.created_at);
    ticket.updated_at = bt.updated_at;
    ticket.solved_at = Some(bt.solved_at.unwrap_or(bt.updated_at));
    ticket.csat = bt
        .satisfaction_rating
        .as_ref()
        .and_then(|r| r.score)
        .map(csat_from)
        .transpose()?;
    ticket.csat_offered = bt.satisfaction_rating.is_some();
    ticket.requester_id = bt.requester_id;
    ticket.requester_email = requester_email;
    ticket.assignee_id = Some(assignee_id);
    ticket.assignee_email = assignee_email;
    ticket.assignee_name = Some(assignee_name);
    ticket.bpo = bpo;
    ticket.payer_tier = extract_custom_field(&bt.custom_fields, fields.payer_tier);
    ticket.language = extract_custom_field(&bt.custom_fields, fields.language);
    ticket.topic = extract_custom_field(&bt.custom_fields, fields.topic);
    ticket.sub_topic = extract_custom_field(&bt.custom_fields, fields.sub_topic);
    ticket.version = extract_custom_field(&bt.custom_fields, fields.version);
    ticket.tags = bt.tags;

    Ok(Outcome::Ready(Box::new(Prepared {
        ticket,
        comments,
        audit,
    })))
}

pub fn run(files: &[String], dry_run: bool) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoInputFile);
    }

    let (db, config) = open_db()?;
    run_impl(&db, &config, files, dry_run)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(
    db: &Database,
    config: &Config,
    files: &[String],
    dry_run: bool,
) -> Result<()> {
    let mut result = IngestResult::default();

    for path in files {
        let reader: Box<dyn BufRead> = if path == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = std::fs::File::open(path).map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "cannot open {}: {}",
                    path, e
                )))
            })?;
            Box::new(BufReader::new(file))
        };
        let source = if path == "-" { "stdin" } else { path.as_str() };

        ingest_reader(db, config, reader, source, dry_run, &mut result)?;
    }

    tracing::info!(
        "Processed {} file(s): {} ingested, {} updated, {} skipped",
        files.len(),
        result.ingested,
        result.updated,
        result.skipped()
    );

    if dry_run {
        println!("Dry run - no changes made");
    }

    println!("Ingest summary:");
    if result.ingested > 0 {
        println!("  ingested: {}", result.ingested);
    }
    if result.updated > 0 {
        println!("  updated: {}", result.updated);
    }
    if result.skipped_unassigned > 0 {
        println!("  skipped (unassigned): {}", result.skipped_unassigned);
    }
    if result.skipped_bot > 0 {
        println!("  skipped (bot assignee): {}", result.skipped_bot);
    }
    if result.skipped_no_human_reply > 0 {
        println!(
            "  skipped (no human reply): {}",
            result.skipped_no_human_reply
        );
    }
    if result.ingested + result.updated + result.skipped() == 0 && result.errors.is_empty() {
        println!("  nothing to do");
    }

    if !result.errors.is_empty() {
        eprintln!("\nwarning: {} parse error(s):", result.errors.len());
        for err in &result.errors {
            eprintln!("  - {}", err);
        }
    }

    Ok(())
}

/// Ingest one JSONL stream, accumulating counts. Bad lines are recorded
/// and skipped; only I/O and database failures abort.
fn ingest_reader(
    db: &Database,
    config: &Config,
    reader: Box<dyn BufRead>,
    source: &str,
    dry_run: bool,
    result: &mut IngestResult,
) -> Result<()> {
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let bundle: Bundle = match serde_json::from_str(line) {
            Ok(b) => b,
            Err(e) => {
                result
                    .errors
                    .push(format!("{} line {}: {}", source, line_num + 1, e));
                continue;
            }
        };

        let prepared = match prepare(bundle, config) {
            Ok(Outcome::Ready(p)) => p,
            Ok(Outcome::Skipped(skip)) => {
                match skip {
                    Skip::Unassigned => result.skipped_unassigned += 1,
                    Skip::BotAssignee => result.skipped_bot += 1,
                    Skip::NoHumanReply => result.skipped_no_human_reply += 1,
                }
                continue;
            }
            Err(e) => {
                result
                    .errors
                    .push(format!("{} line {}: {}", source, line_num + 1, e));
                continue;
            }
        };

        let exists = db.ticket_exists(prepared.ticket.id)?;
        if !dry_run {
            db.upsert_ticket(&prepared.ticket)?;
            for comment in &prepared.comments {
                db.upsert_comment(comment)?;
            }
            if let Some(audit) = &prepared.audit {
                db.upsert_audit(audit)?;
            }
        }
        if exists {
            result.updated += 1;
        } else {
            result.ingested += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
