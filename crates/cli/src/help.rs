// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let placeholder =
        Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(placeholder)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_archive}
  {ingest}      Ingest ticket bundles from JSONL exports
  {list}        List archived tickets
  {show}        Show ticket details and thread
  {search}      Full-text search over comment bodies
  {rank}        Rank tickets by QA review priority
  {review}      Record and inspect review verdicts
  {export}      Export tickets to JSONL

{header_setup}
  {init}        Initialize the ticket archive
  {reindex}     Rebuild the full-text search index
  {completion}  Generate shell completions",
        header_archive = colors::header("Ticket Archive:"),
        header_setup = colors::header("Setup & Maintenance:"),
        ingest = colors::literal("ingest"),
        list = colors::literal("list"),
        show = colors::literal("show"),
        search = colors::literal("search"),
        rank = colors::literal("rank"),
        review = colors::literal("review"),
        export = colors::literal("export"),
        init = colors::literal("init"),
        reindex = colors::literal("reindex"),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  tq init --subdomain acme   Initialize the archive
  tq ingest dump.jsonl       Load ticket bundles
  tq list --days 7           List the last week
  tq rank --limit 10         Pick tickets to review
  tq review set 4521 approved --reviewer lead@acme.com",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
