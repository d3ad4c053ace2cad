// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use tq_core::{Database, Review, ReviewStatus};

use crate::cli::OutputFormat;
use crate::display::{format_review_line, TIME_FORMAT};
use crate::error::Result;

use super::open_db;

/// JSON output schema for the review list command.
#[derive(Serialize)]
struct ReviewListOutputJson<'a> {
    reviews: &'a [Review],
}

pub fn set(id: i64, status: &str, reviewer: Option<&str>, notes: Option<&str>) -> Result<()> {
    let (db, _) = open_db()?;
    set_impl(&db, id, status, reviewer, notes)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn set_impl(
    db: &Database,
    id: i64,
    status: &str,
    reviewer: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let status: ReviewStatus = status.parse()?;
    if !db.ticket_exists(id)? {
        return Err(tq_core::Error::TicketNotFound(id).into());
    }

    let review = Review::new(id, status)
        .with_reviewer(reviewer.map(String::from))
        .with_notes(notes.map(String::from));
    db.set_review(&review)?;

    println!("Recorded {} for ticket {}", status, id);
    Ok(())
}

pub fn show(id: i64) -> Result<()> {
    let (db, _) = open_db()?;
    show_impl(&db, id)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn show_impl(db: &Database, id: i64) -> Result<()> {
    if !db.ticket_exists(id)? {
        return Err(tq_core::Error::TicketNotFound(id).into());
    }

    match db.get_review(id)? {
        Some(review) => println!("{}", format_review_details(&review)),
        None => println!("no review recorded for ticket {}", id),
    }
    Ok(())
}

pub fn list(status: Option<&str>, format: &OutputFormat) -> Result<()> {
    let (db, _) = open_db()?;
    list_impl(&db, status, format)
}

/// Internal implementation that accepts db for testing.
pub(crate) fn list_impl(db: &Database, status: Option<&str>, format: &OutputFormat) -> Result<()> {
    let status: Option<ReviewStatus> = status.map(str::parse).transpose()?;
    let reviews = db.list_reviews(status)?;

    match format {
        OutputFormat::Text => {
            for review in &reviews {
                println!("{}", format_review_line(review));
            }
        }
        OutputFormat::Json => {
            let output = ReviewListOutputJson { reviews: &reviews };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Id => {
            for review in &reviews {
                println!("{}", review.ticket_id);
            }
        }
    }

    Ok(())
}

/// Format the full verdict card for the review show command.
fn format_review_details(review: &Review) -> String {
    let mut output = vec![
        format!("Ticket: {}", review.ticket_id),
        format!("Status: {}", review.status),
    ];
    if let Some(reviewer) = &review.reviewer_email {
        output.push(format!("Reviewer: {}", reviewer));
    }
    output.push(format!(
        "Updated: {}",
        review.updated_at.format(TIME_FORMAT)
    ));
    if let Some(notes) = &review.notes {
        output.push(format!("Notes: {}", notes));
    }
    output.join("\n")
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
