// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Archive configuration management.
//!
//! Configuration is stored in `.tq/config.toml` and includes:
//! - `subdomain`: The Zendesk subdomain, used to build agent ticket URLs
//! - keyword/tag lists that drive filtering and review ranking
//! - custom field IDs and scoring weights

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tq_core::ScoreWeights;

use crate::env;
use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".tq";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "tickets.db";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Archive configuration stored in `.tq/config.toml`.
///
/// Every field has a default, so an empty (or fully commented) config file
/// is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zendesk subdomain for agent URLs (e.g., "acme" for acme.zendesk.com).
    pub subdomain: Option<String>,
    /// Comment authors that do not count as human agent replies.
    pub bot_emails: Vec<String>,
    /// Tags excluded from `tq list` output by default.
    pub excluded_tags: Vec<String>,
    /// Tickets tagged exclusively with these are deprioritized when ranking.
    pub easy_tags: Vec<String>,
    /// Keywords that flag a ticket as sensitive for review ranking.
    pub sensitive_keywords: Vec<String>,
    /// Zendesk custom field IDs to pull into ticket columns.
    pub custom_fields: CustomFieldIds,
    /// Review ranking weights.
    pub weights: ScoreWeights,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            subdomain: None,
            bot_emails: Vec::new(),
            excluded_tags: Vec::new(),
            easy_tags: Vec::new(),
            sensitive_keywords: default_sensitive_keywords(),
            custom_fields: CustomFieldIds::default(),
            weights: ScoreWeights::default(),
        }
    }
}

fn default_sensitive_keywords() -> Vec<String> {
    [
        "refund",
        "charge",
        "payment",
        "legal",
        "lawyer",
        "chargeback",
        "fraud",
        "scam",
        "account lost",
        "hacked",
        "gdpr",
        "delete my data",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Zendesk custom field IDs.
///
/// The defaults match the standard support form; override them in
/// `config.toml` when ingesting from a differently configured instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldIds {
    pub topic: i64,
    pub sub_topic: i64,
    pub version: i64,
    pub language: i64,
    pub payer_tier: i64,
}

impl Default for CustomFieldIds {
    fn default() -> Self {
        CustomFieldIds {
            topic: 360_019_266_879,
            sub_topic: 5_066_696_830_106,
            version: 1_260_819_767_490,
            language: 5_428_339_880_602,
            payer_tier: 6_645_722_066_458,
        }
    }
}

impl Config {
    /// Loads configuration from the given `.tq/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given `.tq/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Agent-facing ticket URL, when a subdomain is configured.
    pub fn agent_url(&self, ticket_id: i64) -> Option<String> {
        self.subdomain
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("https://{s}.zendesk.com/agent/tickets/{ticket_id}"))
    }
}

/// Find the .tq directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path for a work directory.
///
/// `TQ_DB` overrides the default `.tq/tickets.db` location.
pub fn get_db_path(work_dir: &Path) -> PathBuf {
    match env::db_override() {
        Some(path) => {
            tracing::info!("Using database override from TQ_DB: {}", path.display());
            path
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// Initialize a `.tq` directory at the given path.
///
/// Re-running against an existing archive is not an error: the config is
/// kept, and a newly supplied subdomain updates it in place.
pub fn init_work_dir(path: &Path, subdomain: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).is_file() {
        if let Some(sub) = subdomain {
            let mut config = Config::load(&work_dir)?;
            config.subdomain = Some(sub.to_string());
            config.save(&work_dir)?;
        }
        return Ok(work_dir);
    }

    fs::create_dir_all(&work_dir)?;
    fs::write(
        work_dir.join(CONFIG_FILE_NAME),
        default_config_toml(subdomain),
    )?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory covering the database.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "\
# Ticket archive database
tickets.db
tickets.db-wal
tickets.db-shm
";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

/// Default config file contents: every setting present but commented out,
/// except the subdomain when one is supplied at init time.
fn default_config_toml(subdomain: Option<&str>) -> String {
    let subdomain_line = match subdomain {
        Some(sub) => format!("subdomain = \"{sub}\""),
        None => "# subdomain = \"acme\"".to_string(),
    };

    format!(
        "\
# tq configuration
#
# The Zendesk subdomain is used to build agent ticket URLs.
{subdomain_line}

# Comments authored by these addresses do not count as human replies.
# bot_emails = [\"support-bot@example.com\"]

# Tags excluded from `tq list` output by default.
# excluded_tags = [\"spam\", \"auto_closed\"]

# Tickets tagged exclusively with these are deprioritized when ranking.
# easy_tags = [\"password_reset\", \"how_to\"]

# Keywords that flag a ticket as sensitive for review ranking.
# sensitive_keywords = [
#     \"refund\", \"charge\", \"payment\", \"legal\", \"lawyer\", \"chargeback\",
#     \"fraud\", \"scam\", \"account lost\", \"hacked\", \"gdpr\", \"delete my data\",
# ]

# Zendesk custom field IDs for the ticket form.
# [custom_fields]
# topic = 360019266879
# sub_topic = 5066696830106
# version = 1260819767490
# language = 5428339880602
# payer_tier = 6645722066458

# Review ranking weights.
# [weights]
# low_csat = 30
# sensitive = 25
# multi_agents = 15
# vip_complaint = 25
# macro_mismatch = 10
# long_thread = 10
# excellent_personalization = 15
# empathy = 5
# easy_issue_penalty = -20
"
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
