// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::{CommandFactory, Parser};
use tqrs::Cli;

fn main() {
    setup_logging();

    // Bare invocation prints help rather than a usage error.
    if std::env::args_os().len() == 1 {
        let _ = Cli::command().print_help();
        return;
    }

    let cli = Cli::parse();
    if let Err(e) = tqrs::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so piped output stays clean. The filter
/// comes from TQ_LOG and defaults to warnings only.
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = tqrs::env::log_filter()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
