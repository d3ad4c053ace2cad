// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text normalization and keyword matching.
//!
//! These helpers back the list filters, highlighting, and the scoring
//! signals; all matching happens on whitespace-collapsed lowercase text.

use regex::RegexBuilder;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Collapse runs of whitespace to single spaces, trim, and lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// How a keyword list is matched against ticket text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// At least one keyword occurs.
    Any,
    /// Every keyword occurs.
    All,
    /// At least one keyword occurs as a contiguous phrase.
    Phrase,
    /// At least one keyword, treated as a regular expression, matches.
    Regex,
}

impl MatchMode {
    /// Returns the string representation used in flags and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Any => "any",
            MatchMode::All => "all",
            MatchMode::Phrase => "phrase",
            MatchMode::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "any" => Ok(MatchMode::Any),
            "all" => Ok(MatchMode::All),
            "phrase" => Ok(MatchMode::Phrase),
            "regex" => Ok(MatchMode::Regex),
            _ => Err(Error::InvalidMatchMode(s.to_string())),
        }
    }
}

/// Match a keyword list against text under the given mode.
///
/// An empty keyword list matches everything. Matching is case-insensitive
/// over normalized text; only `Regex` can fail, on an invalid pattern.
pub fn matches(text: &str, keywords: &[String], mode: MatchMode) -> Result<bool> {
    if keywords.is_empty() {
        return Ok(true);
    }
    let t = normalize(text);

    match mode {
        MatchMode::Any | MatchMode::Phrase => {
            Ok(keywords.iter().any(|k| t.contains(&k.to_lowercase())))
        }
        MatchMode::All => Ok(keywords.iter().all(|k| t.contains(&k.to_lowercase()))),
        MatchMode::Regex => {
            for pattern in keywords {
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::InvalidPattern(e.to_string()))?;
                if re.is_match(&t) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Wrap every case-insensitive occurrence of each term in the given markers.
///
/// Terms are matched literally (regex-escaped); empty terms are skipped.
pub fn highlight(text: &str, terms: &[String], open: &str, close: &str) -> String {
    if text.is_empty() || terms.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    for term in terms {
        if term.is_empty() {
            continue;
        }
        let Ok(re) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        out = re
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                format!("{open}{}{close}", &caps[0])
            })
            .into_owned();
    }
    out
}

/// The most frequent alphabetic tokens (3+ letters) in a text.
///
/// Ties keep first-occurrence order so repeated calls are deterministic.
pub fn top_terms(text: &str, limit: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut order: Vec<String> = Vec::new();
    let mut freq: HashMap<String, usize> = HashMap::new();

    for token in lower.split(|c: char| !c.is_ascii_alphabetic()) {
        if token.len() < 3 {
            continue;
        }
        if !freq.contains_key(token) {
            order.push(token.to_string());
        }
        *freq.entry(token.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = order
        .into_iter()
        .enumerate()
        .map(|(seen, token)| {
            let count = freq.get(&token).copied().unwrap_or(0);
            (token, count, seen)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(token, _, _)| token)
        .collect()
}

/// Jaccard similarity of two word lists, treated as sets.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
