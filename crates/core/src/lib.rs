// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tq-core: Shared library for the tq ticket QA archive
//!
//! This crate provides the domain types, SQLite storage layer, text
//! analysis helpers, and QA scoring used by the tq CLI.

pub mod db;
pub mod error;
pub mod score;
pub mod text;
pub mod ticket;

pub use db::{CommentHit, Database};
pub use error::{Error, Result};
pub use score::{score_ticket, Reason, ScoreContext, ScoreWeights, Scored, Signals};
pub use text::MatchMode;
pub use ticket::{csat_from, AuditTrail, Bpo, Comment, Review, ReviewStatus, Ticket, TicketStatus};
