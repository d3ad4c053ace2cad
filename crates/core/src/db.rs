// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed database for the ticket archive.
//!
//! The [`Database`] struct provides all data access operations for tickets,
//! comments, audit trails, reviews, and full-text search.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ticket::{AuditTrail, Comment, Review, ReviewStatus, Ticket, CSAT_MAX};

/// SQL schema for the ticket archive database.
///
/// Table and column names (and their declared types) are a compatibility
/// contract: databases written by older ingest jobs open unchanged. Columns
/// carry no NOT NULL or FOREIGN KEY constraints for the same reason; import
/// order is unconstrained and orphaned comment/audit rows are tolerated.
pub const SCHEMA: &str = r#"
-- Archived tickets, one row per support ticket
CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY,
    status TEXT,
    subject TEXT,
    created_at TEXT,
    updated_at TEXT,
    solved_at TEXT,
    csat INTEGER,
    csat_offered INTEGER,
    requester_id INTEGER,
    requester_email TEXT,
    assignee_id INTEGER,
    assignee_email TEXT,
    assignee_name TEXT,
    bpo TEXT,
    payer_tier TEXT,
    language TEXT,
    topic TEXT,
    sub_topic TEXT,
    version TEXT,
    tags TEXT
);

-- Conversation threads; idx is the position within the ticket
CREATE TABLE IF NOT EXISTS comments (
    ticket_id INTEGER,
    idx INTEGER,
    created_at TEXT,
    public INTEGER,
    author_id INTEGER,
    author_email TEXT,
    author_name TEXT,
    body TEXT,
    PRIMARY KEY (ticket_id, idx)
);

-- Macro applications recorded per ticket and timestamp
CREATE TABLE IF NOT EXISTS audits (
    ticket_id INTEGER,
    created_at TEXT,
    macro_titles TEXT,
    PRIMARY KEY (ticket_id, created_at)
);

-- QA verdicts, at most one per ticket
CREATE TABLE IF NOT EXISTS reviews (
    ticket_id INTEGER PRIMARY KEY,
    status TEXT,
    reviewer_email TEXT,
    notes TEXT,
    updated_at TEXT
);

-- Full-text index over comment bodies, external content keyed to the
-- comments rowid and kept in sync by the triggers below
CREATE VIRTUAL TABLE IF NOT EXISTS comments_fts USING fts5(
    body,
    content='comments',
    content_rowid='rowid',
    tokenize='porter unicode61'
);

CREATE TRIGGER IF NOT EXISTS comments_ai AFTER INSERT ON comments BEGIN
    INSERT INTO comments_fts(rowid, body) VALUES (new.rowid, new.body);
END;

CREATE TRIGGER IF NOT EXISTS comments_ad AFTER DELETE ON comments BEGIN
    INSERT INTO comments_fts(comments_fts, rowid, body)
    VALUES ('delete', old.rowid, old.body);
END;

CREATE TRIGGER IF NOT EXISTS comments_au AFTER UPDATE ON comments BEGIN
    INSERT INTO comments_fts(comments_fts, rowid, body)
    VALUES ('delete', old.rowid, old.body);
    INSERT INTO comments_fts(rowid, body) VALUES (new.rowid, new.body);
END;

-- Indexes
CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
CREATE INDEX IF NOT EXISTS idx_tickets_updated ON tickets(updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_tickets_assignee ON tickets(assignee_email);
"#;

/// Column list shared by every ticket SELECT, in contract order.
const TICKET_COLUMNS: &str = "id, status, subject, created_at, updated_at, solved_at, \
     csat, csat_offered, requester_id, requester_email, assignee_id, assignee_email, \
     assignee_name, bpo, payer_tier, language, topic, sub_topic, version, tags";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an optional string value from the database.
fn parse_db_opt<T: std::str::FromStr>(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<T>, rusqlite::Error> {
    match value {
        None => Ok(None),
        Some(s) => parse_db(&s, column).map(Some),
    }
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse an optional RFC3339 timestamp from the database.
fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    match value {
        None => Ok(None),
        Some(s) => parse_timestamp(&s, column).map(Some),
    }
}

/// Parse an optional csat score, enforcing the boundary range.
fn parse_csat_opt(value: Option<i64>) -> std::result::Result<Option<u8>, rusqlite::Error> {
    match value {
        None => Ok(None),
        Some(v) => u8::try_from(v)
            .ok()
            .filter(|s| *s <= CSAT_MAX)
            .map(Some)
            .ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Integer,
                    Box::new(Error::CorruptedData(format!(
                        "csat score {v} out of range in column 'csat'"
                    ))),
                )
            }),
    }
}

/// Decode one ticket row selected with [`TICKET_COLUMNS`].
fn read_ticket(row: &rusqlite::Row<'_>) -> std::result::Result<Ticket, rusqlite::Error> {
    let status_str: String = row.get(1)?;
    let created_str: String = row.get(3)?;
    let updated_str: String = row.get(4)?;
    let solved_str: Option<String> = row.get(5)?;
    let csat_raw: Option<i64> = row.get(6)?;
    let bpo_str: Option<String> = row.get(13)?;
    let tags_str: Option<String> = row.get(19)?;

    Ok(Ticket {
        id: row.get(0)?,
        status: parse_db(&status_str, "status")?,
        subject: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
        solved_at: parse_timestamp_opt(solved_str, "solved_at")?,
        csat: parse_csat_opt(csat_raw)?,
        csat_offered: row.get::<_, Option<bool>>(7)?.unwrap_or(false),
        requester_id: row.get(8)?,
        requester_email: row.get(9)?,
        assignee_id: row.get(10)?,
        assignee_email: row.get(11)?,
        assignee_name: row.get(12)?,
        bpo: parse_db_opt(bpo_str, "bpo")?,
        payer_tier: row.get(14)?,
        language: row.get(15)?,
        topic: row.get(16)?,
        sub_topic: row.get(17)?,
        version: row.get(18)?,
        tags: split_joined(tags_str, ','),
    })
}

/// Decode one comment row.
fn read_comment(row: &rusqlite::Row<'_>) -> std::result::Result<Comment, rusqlite::Error> {
    let created_str: String = row.get(2)?;
    Ok(Comment {
        ticket_id: row.get(0)?,
        idx: row.get(1)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        public: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        author_id: row.get(4)?,
        author_email: row.get(5)?,
        author_name: row.get(6)?,
        body: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

/// Decode one review row.
fn read_review(row: &rusqlite::Row<'_>) -> std::result::Result<Review, rusqlite::Error> {
    let status_str: String = row.get(1)?;
    let updated_str: String = row.get(4)?;
    Ok(Review {
        ticket_id: row.get(0)?,
        status: parse_db(&status_str, "status")?,
        reviewer_email: row.get(2)?,
        notes: row.get(3)?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Split a delimiter-joined storage string, dropping empty segments.
fn split_joined(value: Option<String>, sep: char) -> Vec<String> {
    value
        .map(|s| {
            s.split(sep)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Quote each whitespace-separated term so user input cannot inject FTS5
/// query syntax. Quoted terms are implicitly ANDed by FTS5.
fn fts_match_expr(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run schema creation and all migrations on a database connection.
///
/// This is the single migration path for every entry point. It applies the
/// canonical schema and upgrades databases written by older tools that
/// maintained comments_fts by hand (no sync triggers): their index may be
/// stale, so it is rebuilt from comment content once.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let had_triggers = has_fts_triggers(conn);
    conn.execute_batch(SCHEMA)?;
    if !had_triggers {
        rebuild_index(conn)?;
    }
    Ok(())
}

/// Check whether the FTS sync triggers are already installed.
fn has_fts_triggers(conn: &Connection) -> bool {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'trigger' AND name = 'comments_ai'",
        [],
        |row| row.get(0),
    )
    .unwrap_or(false)
}

/// Rebuild the full-text index from comment content.
fn rebuild_index(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO comments_fts(comments_fts) VALUES ('rebuild')", [])?;
    Ok(())
}

/// One full-text search hit, joined back to its comment row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentHit {
    /// Ticket the matching comment belongs to.
    pub ticket_id: i64,
    /// Position of the matching comment within its ticket.
    pub idx: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    /// Body excerpt with match markers.
    pub snippet: String,
}

/// SQLite database connection with ticket archive operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL so list/search keep working while an ingest runs
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Insert a ticket, or update every non-key column if it already exists.
    pub fn upsert_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tickets (
                 id, status, subject, created_at, updated_at, solved_at, csat, csat_offered,
                 requester_id, requester_email, assignee_id, assignee_email, assignee_name,
                 bpo, payer_tier, language, topic, sub_topic, version, tags
             )
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                     ?17, ?18, ?19, ?20)
             ON CONFLICT(id) DO UPDATE SET
                 status = excluded.status,
                 subject = excluded.subject,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at,
                 solved_at = excluded.solved_at,
                 csat = excluded.csat,
                 csat_offered = excluded.csat_offered,
                 requester_id = excluded.requester_id,
                 requester_email = excluded.requester_email,
                 assignee_id = excluded.assignee_id,
                 assignee_email = excluded.assignee_email,
                 assignee_name = excluded.assignee_name,
                 bpo = excluded.bpo,
                 payer_tier = excluded.payer_tier,
                 language = excluded.language,
                 topic = excluded.topic,
                 sub_topic = excluded.sub_topic,
                 version = excluded.version,
                 tags = excluded.tags",
            params![
                ticket.id,
                ticket.status.as_str(),
                ticket.subject,
                ticket.created_at.to_rfc3339(),
                ticket.updated_at.to_rfc3339(),
                ticket.solved_at.map(|t| t.to_rfc3339()),
                ticket.csat,
                ticket.csat_offered,
                ticket.requester_id,
                ticket.requester_email,
                ticket.assignee_id,
                ticket.assignee_email,
                ticket.assignee_name,
                ticket.bpo.map(|b| b.as_str()),
                ticket.payer_tier,
                ticket.language,
                ticket.topic,
                ticket.sub_topic,
                ticket.version,
                ticket.tags.join(","),
            ],
        )?;
        Ok(())
    }

    /// Get a ticket by id.
    pub fn get_ticket(&self, id: i64) -> Result<Ticket> {
        let ticket = self
            .conn
            .query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id],
                read_ticket,
            )
            .optional()?;

        ticket.ok_or(Error::TicketNotFound(id))
    }

    /// Check if a ticket exists.
    pub fn ticket_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tickets WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Total number of archived tickets.
    pub fn count_tickets(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get all tickets updated at or after the cutoff, newest first.
    ///
    /// Timestamps are stored RFC3339 in UTC with a uniform offset, so the
    /// string comparison in SQL agrees with chronological order.
    pub fn recent_tickets(&self, since: DateTime<Utc>) -> Result<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE updated_at >= ?1 ORDER BY updated_at DESC"
        ))?;

        let tickets = stmt
            .query_map(params![since.to_rfc3339()], read_ticket)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tickets)
    }

    /// Get all tickets, newest first.
    pub fn all_tickets(&self) -> Result<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY updated_at DESC"
        ))?;

        let tickets = stmt
            .query_map([], read_ticket)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tickets)
    }

    /// Insert a comment, or update it if (ticket_id, idx) already exists.
    pub fn upsert_comment(&self, comment: &Comment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO comments (
                 ticket_id, idx, created_at, public, author_id, author_email, author_name, body
             )
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(ticket_id, idx) DO UPDATE SET
                 created_at = excluded.created_at,
                 public = excluded.public,
                 author_id = excluded.author_id,
                 author_email = excluded.author_email,
                 author_name = excluded.author_name,
                 body = excluded.body",
            params![
                comment.ticket_id,
                comment.idx,
                comment.created_at.to_rfc3339(),
                comment.public,
                comment.author_id,
                comment.author_email,
                comment.author_name,
                comment.body,
            ],
        )?;
        Ok(())
    }

    /// Get all comments for a ticket, in thread order.
    pub fn comments_for(&self, ticket_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticket_id, idx, created_at, public, author_id, author_email, author_name, body
             FROM comments WHERE ticket_id = ?1 ORDER BY idx",
        )?;

        let comments = stmt
            .query_map(params![ticket_id], read_comment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Batch-fetch comments for a set of tickets, grouped by ticket id.
    pub fn comments_for_many(&self, ticket_ids: &[i64]) -> Result<HashMap<i64, Vec<Comment>>> {
        let mut map: HashMap<i64, Vec<Comment>> = HashMap::new();
        if ticket_ids.is_empty() {
            return Ok(map);
        }

        let placeholders = vec!["?"; ticket_ids.len()].join(",");
        let sql = format!(
            "SELECT ticket_id, idx, created_at, public, author_id, author_email, author_name, body
             FROM comments WHERE ticket_id IN ({placeholders}) ORDER BY ticket_id, idx"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = ticket_ids
            .iter()
            .map(|id| id as &dyn rusqlite::ToSql)
            .collect();

        let comments = stmt
            .query_map(params_refs.as_slice(), read_comment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for comment in comments {
            map.entry(comment.ticket_id).or_default().push(comment);
        }

        Ok(map)
    }

    /// Insert an audit trail, or replace its macro titles if the
    /// (ticket_id, created_at) row already exists.
    pub fn upsert_audit(&self, audit: &AuditTrail) -> Result<()> {
        self.conn.execute(
            "INSERT INTO audits (ticket_id, created_at, macro_titles)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(ticket_id, created_at) DO UPDATE SET
                 macro_titles = excluded.macro_titles",
            params![
                audit.ticket_id,
                audit.created_at.to_rfc3339(),
                audit.macro_titles.join("|"),
            ],
        )?;
        Ok(())
    }

    /// Get all audit trails for a ticket, oldest first.
    pub fn audits_for(&self, ticket_id: i64) -> Result<Vec<AuditTrail>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticket_id, created_at, macro_titles
             FROM audits WHERE ticket_id = ?1 ORDER BY created_at",
        )?;

        let audits = stmt
            .query_map(params![ticket_id], |row| {
                let created_str: String = row.get(1)?;
                let titles: Option<String> = row.get(2)?;
                Ok(AuditTrail {
                    ticket_id: row.get(0)?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                    macro_titles: split_joined(titles, '|'),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(audits)
    }

    /// Record a review verdict, replacing any earlier verdict for the ticket.
    pub fn set_review(&self, review: &Review) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reviews (ticket_id, status, reviewer_email, notes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(ticket_id) DO UPDATE SET
                 status = excluded.status,
                 reviewer_email = excluded.reviewer_email,
                 notes = excluded.notes,
                 updated_at = excluded.updated_at",
            params![
                review.ticket_id,
                review.status.as_str(),
                review.reviewer_email,
                review.notes,
                review.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get the review for a ticket, if one was recorded.
    pub fn get_review(&self, ticket_id: i64) -> Result<Option<Review>> {
        let review = self
            .conn
            .query_row(
                "SELECT ticket_id, status, reviewer_email, notes, updated_at
                 FROM reviews WHERE ticket_id = ?1",
                params![ticket_id],
                read_review,
            )
            .optional()?;

        Ok(review)
    }

    /// List reviews, optionally filtered by verdict, most recent first.
    pub fn list_reviews(&self, status: Option<ReviewStatus>) -> Result<Vec<Review>> {
        let mut sql = String::from(
            "SELECT ticket_id, status, reviewer_email, notes, updated_at FROM reviews",
        );
        let mut params_vec: Vec<String> = Vec::new();

        if let Some(s) = status {
            sql.push_str(" WHERE status = ?");
            params_vec.push(s.as_str().to_string());
        }

        sql.push_str(" ORDER BY updated_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();

        let reviews = stmt
            .query_map(params_refs.as_slice(), read_review)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    /// Full-text search over comment bodies, best matches first.
    ///
    /// The query is split on whitespace and each term quoted, so FTS5
    /// operators in user input are matched literally rather than parsed.
    pub fn search_comments(&self, query: &str, limit: usize) -> Result<Vec<CommentHit>> {
        let match_expr = fts_match_expr(query);
        if match_expr.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT c.ticket_id, c.idx, c.author_email,
                    snippet(comments_fts, 0, '[', ']', '...', 12)
             FROM comments_fts
             JOIN comments c ON c.rowid = comments_fts.rowid
             WHERE comments_fts MATCH ?1
             ORDER BY bm25(comments_fts)
             LIMIT ?2",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let hits = stmt
            .query_map(params![match_expr, limit_i64], |row| {
                Ok(CommentHit {
                    ticket_id: row.get(0)?,
                    idx: row.get(1)?,
                    author_email: row.get(2)?,
                    snippet: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    /// Rebuild the full-text index from comment content.
    pub fn rebuild_fts(&self) -> Result<()> {
        rebuild_index(&self.conn)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
