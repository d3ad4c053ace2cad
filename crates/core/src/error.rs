// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tq-core operations.

use thiserror::Error;

/// All possible errors that can occur in tq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ticket not found: {0}")]
    TicketNotFound(i64),

    #[error(
        "invalid ticket status: '{0}'\n  hint: valid statuses are: new, open, pending, hold, solved, closed"
    )]
    InvalidStatus(String),

    #[error(
        "invalid review status: '{0}'\n  hint: valid statuses are: pending, approved, rejected"
    )]
    InvalidReviewStatus(String),

    #[error("invalid bpo: '{0}'\n  hint: valid values are: icx, tg, cnx")]
    InvalidBpo(String),

    #[error("invalid match mode: '{0}'\n  hint: valid modes are: any, all, phrase, regex")]
    InvalidMatchMode(String),

    #[error("invalid csat score: {0}\n  hint: scores range from 0 to 10")]
    InvalidCsat(i64),

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for tq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
