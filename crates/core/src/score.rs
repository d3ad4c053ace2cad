// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! QA-worthiness scoring for archived tickets.
//!
//! Scoring runs in two stages: [`Signals::derive`] turns a ticket and its
//! stored comment/audit rows into boolean signals, and [`score_ticket`]
//! folds those signals into a weighted total with per-signal reasons.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::text;
use crate::ticket::{AuditTrail, Comment, Ticket};

/// Complaint vocabulary checked against requester-visible text.
const COMPLAINT_MARKERS: &[&str] = &[
    "angry",
    "furious",
    "disappointed",
    "unfair",
    "scam",
    "cheat",
    "cheating",
    "rigged",
    "refund",
];

/// Stems an empathetic agent reply tends to contain.
const EMPATHY_MARKERS: &[&str] = &[
    "sorry",
    "apolog",
    "i understand",
    "appreciate your",
    "thank you for your patience",
];

/// CSAT at or below this counts as a detractor rating.
const LOW_CSAT_MAX: u8 = 2;
/// CSAT at or above this counts as a promoter rating.
const HIGH_CSAT_MIN: u8 = 5;
/// A thread with more public comments than this counts as long.
const LONG_THREAD_PUBLIC: usize = 4;
/// More distinct public authors than this counts as multi-agent.
const MULTI_AUTHOR_DISTINCT: usize = 2;
/// Minimum top-term overlap for an agent reply to count as personalized.
const PERSONALIZATION_THRESHOLD: f64 = 0.1;
/// How many top terms per side feed the personalization overlap.
const PERSONALIZATION_TERMS: usize = 12;

/// Points awarded per signal.
///
/// Missing config keys fall back to the field defaults, so partial
/// `[weights]` tables are fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub low_csat: i64,
    pub sensitive: i64,
    pub multi_agents: i64,
    pub vip_complaint: i64,
    pub macro_mismatch: i64,
    pub long_thread: i64,
    pub excellent_personalization: i64,
    pub empathy: i64,
    pub easy_issue_penalty: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            low_csat: 30,
            sensitive: 25,
            multi_agents: 15,
            vip_complaint: 25,
            macro_mismatch: 10,
            long_thread: 10,
            excellent_personalization: 15,
            empathy: 5,
            easy_issue_penalty: -20,
        }
    }
}

/// Keyword lists signal derivation reads, sourced from config.
#[derive(Debug, Clone, Default)]
pub struct ScoreContext {
    /// Keywords that flag a ticket as sensitive (matched case-insensitively).
    pub sensitive_keywords: Vec<String>,
    /// Tags that mark routine technical issues.
    pub easy_tags: Vec<String>,
}

/// Boolean signals derived from stored rows before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub complaint: bool,
    pub sensitive: bool,
    pub multi_agents: bool,
    pub long_thread: bool,
    pub empathy: bool,
    pub personalization: bool,
    pub macro_mismatch: bool,
    pub easy_only: bool,
}

impl Signals {
    /// Derives the signals for one ticket from its stored rows.
    pub fn derive(
        ticket: &Ticket,
        comments: &[Comment],
        audits: &[AuditTrail],
        ctx: &ScoreContext,
    ) -> Signals {
        let public: Vec<&Comment> = comments.iter().filter(|c| c.public).collect();

        let mut searchable = ticket.subject.clone();
        for comment in &public {
            searchable.push('\n');
            searchable.push_str(&comment.body);
        }
        let normalized = text::normalize(&searchable);

        let complaint = COMPLAINT_MARKERS.iter().any(|m| normalized.contains(m));
        let sensitive = ctx
            .sensitive_keywords
            .iter()
            .any(|k| !k.is_empty() && normalized.contains(&k.to_lowercase()));

        let authors: HashSet<&str> = public
            .iter()
            .filter_map(|c| c.author_email.as_deref())
            .filter(|e| !e.is_empty())
            .collect();
        let multi_agents = authors.len() > MULTI_AUTHOR_DISTINCT;
        let long_thread = public.len() > LONG_THREAD_PUBLIC;

        // Requester-side text (subject plus their comments) versus agent-side
        // replies; authorship falls back to the agent side when unknown.
        let requester = ticket.requester_email.as_deref().unwrap_or("");
        let mut user_text = ticket.subject.clone();
        let mut agent_text = String::new();
        for comment in &public {
            let author = comment.author_email.as_deref().unwrap_or("");
            let side = if !requester.is_empty() && author == requester {
                &mut user_text
            } else {
                &mut agent_text
            };
            side.push('\n');
            side.push_str(&comment.body);
        }

        let agent_lower = agent_text.to_lowercase();
        let empathy = EMPATHY_MARKERS.iter().any(|m| agent_lower.contains(m));

        let overlap = text::jaccard(
            &text::top_terms(&user_text, PERSONALIZATION_TERMS),
            &text::top_terms(&agent_text, PERSONALIZATION_TERMS),
        );
        let personalization = overlap >= PERSONALIZATION_THRESHOLD;

        let macro_titles: Vec<&String> = audits
            .iter()
            .flat_map(|a| a.macro_titles.iter())
            .collect();
        let macro_mismatch = match ticket.topic.as_deref() {
            Some(topic) if !macro_titles.is_empty() => {
                let topic = text::normalize(topic);
                !topic.is_empty()
                    && !macro_titles
                        .iter()
                        .any(|title| text::normalize(title).contains(&topic))
            }
            _ => false,
        };

        let easy_only = !ticket.tags.is_empty()
            && !ctx.easy_tags.is_empty()
            && ticket.tags.iter().all(|t| ctx.easy_tags.contains(t));

        Signals {
            complaint,
            sensitive,
            multi_agents,
            long_thread,
            empathy,
            personalization,
            macro_mismatch,
            easy_only,
        }
    }
}

/// Why a ticket scored, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    LowCsat,
    SensitiveKeyword,
    MultipleAuthors,
    VipComplaint,
    MacroMismatch,
    LongThread,
    PersonalizedPositive,
    Empathy,
    EasyOnly,
}

impl Reason {
    /// Returns the human-readable label shown in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::LowCsat => "Low CSAT",
            Reason::SensitiveKeyword => "Sensitive keyword",
            Reason::MultipleAuthors => "Multiple authors",
            Reason::VipComplaint => "VIP complaint",
            Reason::MacroMismatch => "Macro/topic mismatch",
            Reason::LongThread => "Long thread",
            Reason::PersonalizedPositive => "Personalized & positive",
            Reason::Empathy => "Empathy",
            Reason::EasyOnly => "Easy tech-only",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of scoring one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scored {
    pub score: i64,
    pub reasons: Vec<Reason>,
}

/// Folds derived signals into a weighted score with reasons.
pub fn score_ticket(ticket: &Ticket, signals: &Signals, weights: &ScoreWeights) -> Scored {
    let mut scored = Scored {
        score: 0,
        reasons: Vec::new(),
    };

    if matches!(ticket.csat, Some(c) if c <= LOW_CSAT_MAX) {
        scored.score += weights.low_csat;
        scored.reasons.push(Reason::LowCsat);
    }
    if signals.sensitive {
        scored.score += weights.sensitive;
        scored.reasons.push(Reason::SensitiveKeyword);
    }
    if signals.multi_agents {
        scored.score += weights.multi_agents;
        scored.reasons.push(Reason::MultipleAuthors);
    }
    let vip = matches!(
        ticket.payer_tier.as_deref(),
        Some(t) if t.eq_ignore_ascii_case("vip") || t.eq_ignore_ascii_case("whale")
    );
    if vip && signals.complaint {
        scored.score += weights.vip_complaint;
        scored.reasons.push(Reason::VipComplaint);
    }
    if signals.macro_mismatch {
        scored.score += weights.macro_mismatch;
        scored.reasons.push(Reason::MacroMismatch);
    }
    if signals.long_thread {
        scored.score += weights.long_thread;
        scored.reasons.push(Reason::LongThread);
    }
    if matches!(ticket.csat, Some(c) if c >= HIGH_CSAT_MIN) && signals.personalization {
        scored.score += weights.excellent_personalization;
        scored.reasons.push(Reason::PersonalizedPositive);
    }
    if signals.empathy {
        scored.score += weights.empathy;
        scored.reasons.push(Reason::Empathy);
    }
    if signals.easy_only && !signals.sensitive {
        scored.score += weights.easy_issue_penalty;
        scored.reasons.push(Reason::EasyOnly);
    }

    scored
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod tests;
