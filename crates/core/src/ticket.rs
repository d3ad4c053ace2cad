// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core ticket types for the tq QA archive.
//!
//! This module contains the fundamental data types: Ticket, TicketStatus,
//! Bpo, Comment, AuditTrail, Review, and ReviewStatus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Highest customer-satisfaction score accepted at the boundary.
pub const CSAT_MAX: u8 = 10;

/// Workflow status of a helpdesk ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Just created, not yet triaged.
    New,
    /// Being worked by an agent.
    Open,
    /// Waiting on the requester.
    Pending,
    /// Waiting on a third party.
    Hold,
    /// Agent marked the ticket resolved.
    Solved,
    /// Resolution confirmed; no further changes expected.
    Closed,
}

impl TicketStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Hold => "hold",
            TicketStatus::Solved => "solved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "new" => Ok(TicketStatus::New),
            "open" => Ok(TicketStatus::Open),
            "pending" => Ok(TicketStatus::Pending),
            "hold" => Ok(TicketStatus::Hold),
            "solved" => Ok(TicketStatus::Solved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Outsourcing partner handling a ticket, inferred from assignee groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bpo {
    Icx,
    Tg,
    Cnx,
}

impl Bpo {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bpo::Icx => "ICX",
            Bpo::Tg => "TG",
            Bpo::Cnx => "CNX",
        }
    }

    /// Infer the partner from an assignee's group names.
    ///
    /// Group naming at the helpdesk embeds the partner, e.g. "Tier1 ICX"
    /// or "Telus Night Shift". First match wins, in ICX, TG, CNX order.
    pub fn from_group_names(groups: &[String]) -> Option<Bpo> {
        let joined = groups
            .iter()
            .map(|g| g.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.contains("icx") {
            Some(Bpo::Icx)
        } else if joined.contains("tg") || joined.contains("telus") {
            Some(Bpo::Tg)
        } else if joined.contains("cnx") || joined.contains("concentrix") {
            Some(Bpo::Cnx)
        } else {
            None
        }
    }
}

impl fmt::Display for Bpo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Bpo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "icx" => Ok(Bpo::Icx),
            "tg" => Ok(Bpo::Tg),
            "cnx" => Ok(Bpo::Cnx),
            _ => Err(Error::InvalidBpo(s.to_string())),
        }
    }
}

/// Validate a customer-satisfaction score at the ingest boundary.
///
/// The storage column is a bare INTEGER; this is the one place a score is
/// range-checked before it reaches the database.
pub fn csat_from(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= CSAT_MAX)
        .ok_or(Error::InvalidCsat(value))
}

/// The primary entity: one archived support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Helpdesk ticket id.
    pub id: i64,
    /// Current workflow state.
    pub status: TicketStatus,
    /// Subject line.
    pub subject: String,
    /// When the ticket was opened.
    pub created_at: DateTime<Utc>,
    /// When the ticket last changed.
    pub updated_at: DateTime<Utc>,
    /// When the ticket was resolved, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved_at: Option<DateTime<Utc>>,
    /// Customer-satisfaction score, if a rating was submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csat: Option<u8>,
    /// Whether a satisfaction survey was offered at all.
    pub csat_offered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    /// Outsourcing partner, inferred at ingest time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpo: Option<Bpo>,
    /// Payer segment from the helpdesk custom field (e.g. "VIP", "Whale").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Helpdesk tags, stored comma-joined.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Ticket {
    /// Creates a ticket with optional fields empty.
    pub fn new(id: i64, status: TicketStatus, subject: String, created_at: DateTime<Utc>) -> Self {
        Ticket {
            id,
            status,
            subject,
            created_at,
            updated_at: created_at,
            solved_at: None,
            csat: None,
            csat_offered: false,
            requester_id: None,
            requester_email: None,
            assignee_id: None,
            assignee_email: None,
            assignee_name: None,
            bpo: None,
            payer_tier: None,
            language: None,
            topic: None,
            sub_topic: None,
            version: None,
            tags: Vec::new(),
        }
    }
}

/// One message in a ticket's conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// The ticket this comment belongs to.
    pub ticket_id: i64,
    /// Position within the thread (0-based).
    pub idx: i64,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
    /// Visible to the requester, as opposed to an internal note.
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Message text.
    pub body: String,
}

/// Macro applications recorded against a ticket at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    /// The ticket the macros were applied to.
    pub ticket_id: i64,
    /// When the trail was recorded.
    pub created_at: DateTime<Utc>,
    /// Titles of applied macros, stored pipe-joined.
    pub macro_titles: Vec<String>,
}

/// Verdict of a quality review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Flagged for review, verdict not yet recorded.
    Pending,
    /// Agent handling met the bar.
    Approved,
    /// Agent handling needs follow-up.
    Rejected,
}

impl ReviewStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(Error::InvalidReviewStatus(s.to_string())),
        }
    }
}

/// A quality-review verdict, at most one per ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// The reviewed ticket.
    pub ticket_id: i64,
    /// Verdict.
    pub status: ReviewStatus,
    /// Who recorded the verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_email: Option<String>,
    /// Free-form reviewer notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the verdict was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review with the given verdict, stamped now.
    pub fn new(ticket_id: i64, status: ReviewStatus) -> Self {
        Review {
            ticket_id,
            status,
            reviewer_email: None,
            notes: None,
            updated_at: Utc::now(),
        }
    }

    /// Sets the reviewer (builder pattern).
    pub fn with_reviewer(mut self, reviewer_email: Option<String>) -> Self {
        self.reviewer_email = reviewer_email;
        self
    }

    /// Sets the notes (builder pattern).
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
