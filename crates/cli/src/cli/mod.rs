// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::{FilterArgs, LimitArgs, WindowArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    #[value(alias = "ids")]
    Id,
}

#[derive(Debug, Parser)]
#[command(name = "tq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "An offline QA archive for helpdesk tickets")]
#[command(
    long_about = "An offline QA archive for helpdesk tickets.\n\n\
    Ingest ticket exports into a local full-text-searchable archive, then filter,\n\
    rank, and review how tickets were handled."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Run as if tq was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Ticket Archive
    // ─────────────────────────────────────────────────────────────────────────
    /// Ingest ticket bundles from JSONL exports
    #[command(after_help = colors::examples("\
Examples:
  tq ingest dump.jsonl              Ingest one export file
  tq ingest a.jsonl b.jsonl         Ingest several files in order
  tq ingest -                       Ingest from stdin
  tq ingest --dry-run dump.jsonl    Parse and report without writing"))]
    Ingest {
        /// Input files, one JSON ticket bundle per line (use '-' for stdin)
        #[arg(value_name = "FILE")]
        files: Vec<String>,

        /// Parse and report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List archived tickets
    #[command(after_help = colors::examples("\
Examples:
  tq list                           Tickets updated in the last 5 days
  tq list --days 30                 Widen the window to a month
  tq list -t vip                    Tickets tagged 'vip'
  tq list --exclude-tag spam        Drop tagged tickets from the output
  tq list -k refund                 Tickets mentioning 'refund'
  tq list -k refund -k legal --match all   Require every keyword
  tq list --match regex -k \"ref{1,2}und\"   Regex keyword matching
  tq list -s solved -a maya@acme.com       Solved tickets for one agent
  tq list --bpo icx -n 10           First ten ICX-handled tickets
  tq list -o json                   Output in JSON format
  tq list -o id                     Output only ticket IDs"))]
    List {
        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Filter by status (new, open, pending, hold, solved, closed)
        #[arg(long, short)]
        status: Option<String>,

        /// Filter by assignee email
        #[arg(long, short)]
        assignee: Option<String>,

        /// Filter by outsourcing partner (icx, tg, cnx)
        #[arg(long)]
        bpo: Option<String>,

        #[command(flatten)]
        limits: LimitArgs,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show full details of a ticket
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  tq show 4521                      Ticket card, macros, review, thread
  tq show 4521 -k refund            Highlight 'refund' in comment bodies
  tq show 4521 -o json              Output in JSON format")
    )]
    Show {
        /// Ticket ID
        id: i64,

        /// Highlight keyword occurrences in comment bodies (repeatable)
        #[arg(long, short = 'k', value_name = "KEYWORD")]
        keyword: Vec<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Full-text search over comment bodies
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  tq search refund                  Tickets whose comments mention 'refund'
  tq search refund denied           All words must match
  tq search \"account locked\" -n 5   Limit to 5 hits
  tq search refund -o id            Output matching ticket IDs")
    )]
    Search {
        /// Search terms (matched against comment bodies)
        #[arg(required = true, value_parser = non_empty_string)]
        query: Vec<String>,

        #[command(flatten)]
        limits: LimitArgs,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Rank tickets by QA review priority
    #[command(after_help = colors::examples("\
Examples:
  tq rank                           Rank tickets from the last 5 days
  tq rank --days 30 -n 5            Top five of the month
  tq rank -o json                   Scores and reasons as JSON"))]
    Rank {
        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        limits: LimitArgs,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Record and inspect review verdicts
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Export tickets to JSONL
    #[command(after_help = colors::examples("\
Examples:
  tq export                         Write every ticket bundle to stdout
  tq export --out archive.jsonl     Write to a file
  tq export --days 30               Only tickets updated in the last month"))]
    Export {
        /// Output file path (stdout when omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<String>,

        #[command(flatten)]
        window: WindowArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Setup & Maintenance
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize the ticket archive in the current directory (or specified path)
    #[command(after_help = colors::examples("\
Examples:
  tq init                           Initialize .tq/ here
  tq init --subdomain acme          Also record the helpdesk subdomain
  tq init --path ~/archive          Initialize at a specific path"))]
    Init {
        /// Helpdesk subdomain used to build agent ticket URLs
        #[arg(long, value_parser = non_empty_string)]
        subdomain: Option<String>,

        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Rebuild the full-text search index from stored comments
    Reindex,

    /// Generate shell completions
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  tq completion bash > ~/.local/share/bash-completion/completions/tq
  tq completion zsh > ~/.zfunc/_tq
  tq completion fish > ~/.config/fish/completions/tq.fish")
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Review verdict commands.
#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// Record a verdict for a ticket
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  tq review set 4521 approved                          Approve the handling
  tq review set 4521 rejected --notes \"tone\"           Reject with notes
  tq review set 4521 pending --reviewer lead@acme.com  Flag for review")
    )]
    Set {
        /// Ticket ID
        id: i64,

        /// Verdict (pending, approved, rejected)
        status: String,

        /// Reviewer email
        #[arg(long, value_name = "EMAIL")]
        reviewer: Option<String>,

        /// Free-form review notes
        #[arg(long, value_name = "TEXT")]
        notes: Option<String>,
    },

    /// Show the verdict recorded for a ticket
    #[command(arg_required_else_help = true)]
    Show {
        /// Ticket ID
        id: i64,
    },

    /// List recorded verdicts
    List {
        /// Filter by verdict (pending, approved, rejected)
        #[arg(long, short)]
        status: Option<String>,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
