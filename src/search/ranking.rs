//! Candidate selection: AI ranking input and the deterministic score used
//! when the model is unavailable.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::profile::{Field, UserRecord};

use super::query::searchable_texts;

/// Candidates shown to the model, in store order.
pub const AI_RANKING_WINDOW: usize = 15;

const BIO_EXCERPT_CHARS: usize = 150;
const ACTIVE_WITHIN_DAYS: i64 = 30;

/// Compact per-candidate view sent to the ranking model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    /// Ranking key returned by the model.
    pub email: String,
    pub name: String,
    pub about: String,
    pub role: String,
    pub domain: String,
    pub location: String,
    pub gives: Vec<String>,
    pub asks: Vec<String>,
}

impl CandidateSummary {
    pub fn from_user(user: &UserRecord) -> Self {
        let location = [user.text(Field::City), user.text(Field::State)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            email: user.basic_profile.email.clone(),
            name: user.display_name().to_string(),
            about: user
                .basic_profile
                .about
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(BIO_EXCERPT_CHARS)
                .collect(),
            role: user
                .text(Field::ProfessionalRole)
                .unwrap_or("Role not specified")
                .to_string(),
            domain: user
                .text(Field::Domain)
                .unwrap_or("Domain not specified")
                .to_string(),
            location: if location.is_empty() {
                "Location not specified".to_string()
            } else {
                location
            },
            gives: user.list(Field::CommunityGives).to_vec(),
            asks: user.list(Field::CommunityAsks).to_vec(),
        }
    }
}

/// Summaries for the first [`AI_RANKING_WINDOW`] candidates.
pub fn summarize(candidates: &[UserRecord]) -> Vec<CandidateSummary> {
    candidates
        .iter()
        .take(AI_RANKING_WINDOW)
        .map(CandidateSummary::from_user)
        .collect()
}

/// Map model-ranked emails back to candidates, skipping unknown and
/// repeated keys.
pub fn select_by_keys(candidates: &[UserRecord], keys: &[String], max: usize) -> Vec<UserRecord> {
    let mut taken = HashSet::new();
    keys.iter()
        .filter_map(|key| {
            candidates.iter().position(|c| {
                !c.basic_profile.email.is_empty()
                    && c.basic_profile.email.eq_ignore_ascii_case(key.trim())
            })
        })
        .filter(|index| taken.insert(*index))
        .take(max)
        .map(|index| candidates[index].clone())
        .collect()
}

/// Deterministic relevance of one candidate.
pub fn relevance_score(user: &UserRecord, keywords: &[String], now: DateTime<Utc>) -> u32 {
    let text = searchable_texts(user).join(" ").to_lowercase();
    let mut score = keywords
        .iter()
        .filter(|k| text.contains(&k.to_lowercase()))
        .count() as u32;

    if user.enhanced_profile.completed {
        score += 2;
    }
    if user.text(Field::Linkedin).is_some() || user.basic_profile.linkedin.is_some() {
        score += 1;
    }
    if !user.list(Field::CommunityGives).is_empty() {
        score += 1;
    }
    if user
        .last_active
        .is_some_and(|at| now - at < Duration::days(ACTIVE_WITHIN_DAYS))
    {
        score += 1;
    }
    score
}

/// Top `max` candidates by [`relevance_score`]; ties keep store order.
pub fn fallback_rank(
    candidates: &[UserRecord],
    keywords: &[String],
    max: usize,
    now: DateTime<Utc>,
) -> Vec<UserRecord> {
    let mut scored: Vec<(u32, &UserRecord)> = candidates
        .iter()
        .map(|user| (relevance_score(user, keywords, now), user))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(max)
        .map(|(_, user)| user.clone())
        .collect()
}
