// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tqrs - An offline QA archive for helpdesk tickets.
//!
//! This crate provides the functionality behind the `tq` CLI tool,
//! a local ticket archive that stores helpdesk exports in a SQLite
//! database for quality review.
//!
//! # Main Components
//!
//! - [`Config`] - Archive configuration (subdomain, keyword lists, score weights)
//! - [`commands`](crate::run) - Ingest, list, search, rank, review, and export operations
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.tq/` directory, then open the database:
//!
//! ```rust,ignore
//! use tqrs::{init_work_dir, find_work_dir, get_db_path, Config};
//! use tq_core::Database;
//!
//! // Initialize a new archive
//! let work_dir = init_work_dir(Path::new("."), Some("acme"))?;
//!
//! // Later, find and open an existing archive
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! let db = Database::open(&get_db_path(&work_dir))?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod env;
pub mod help;

pub mod config;
pub mod error;

pub use cli::{Cli, Command, FilterArgs, LimitArgs, OutputFormat, ReviewCommand, WindowArgs};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(|e| Error::ChangeDirectory {
            path: dir.clone(),
            source: e,
        })?;
    }
    match cli.command {
        Command::Init { subdomain, path } => commands::init::run(subdomain, path),
        Command::Ingest { files, dry_run } => commands::ingest::run(&files, dry_run),
        Command::List {
            window,
            filters,
            status,
            assignee,
            bpo,
            limits,
            output,
        } => commands::list::run(
            window.days,
            &filters,
            status.as_deref(),
            assignee.as_deref(),
            bpo.as_deref(),
            limits.limit,
            &output,
        ),
        Command::Show {
            id,
            keyword,
            output,
        } => commands::show::run(id, &keyword, &output),
        Command::Search {
            query,
            limits,
            output,
        } => commands::search::run(&query, limits.limit, &output),
        Command::Rank {
            window,
            limits,
            output,
        } => commands::rank::run(window.days, limits.limit, &output),
        Command::Review(cmd) => match cmd {
            ReviewCommand::Set {
                id,
                status,
                reviewer,
                notes,
            } => commands::review::set(id, &status, reviewer.as_deref(), notes.as_deref()),
            ReviewCommand::Show { id } => commands::review::show(id),
            ReviewCommand::List { status, output } => {
                commands::review::list(status.as_deref(), &output)
            }
        },
        Command::Export { out, window } => commands::export::run(out.as_deref(), window.days),
        Command::Reindex => commands::reindex::run(),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tq", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
