// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common filter patterns.

use clap::Args;

/// Tag and keyword filter arguments.
#[derive(Args, Clone, Debug)]
pub struct FilterArgs {
    /// Filter by tag (comma-separated for OR, repeat for more)
    #[arg(long, short = 't', value_delimiter = ',')]
    pub tag: Vec<String>,

    /// Exclude tickets carrying a tag (comma-separated or repeated)
    #[arg(long, value_name = "TAG", value_delimiter = ',')]
    pub exclude_tag: Vec<String>,

    /// Require a keyword in the subject or comment bodies (repeatable)
    #[arg(long, short = 'k', value_name = "KEYWORD")]
    pub keyword: Vec<String>,

    /// Exclude tickets whose text contains a keyword (repeatable)
    #[arg(long, value_name = "KEYWORD")]
    pub exclude_keyword: Vec<String>,

    /// How --keyword values combine (any, all, phrase, regex)
    #[arg(long = "match", value_name = "MODE", default_value = "any")]
    pub match_mode: String,
}

// Manual impl so defaults built in code carry the same match mode as
// the clap default_value above.
impl Default for FilterArgs {
    fn default() -> Self {
        FilterArgs {
            tag: Vec::new(),
            exclude_tag: Vec::new(),
            keyword: Vec::new(),
            exclude_keyword: Vec::new(),
            match_mode: "any".to_string(),
        }
    }
}

/// Time window arguments for commands that scan recent tickets.
#[derive(Args, Clone, Debug, Default)]
pub struct WindowArgs {
    /// Only consider tickets updated in the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<i64>,
}

/// Limit arguments for paginated results.
#[derive(Args, Clone, Debug, Default)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,
}
