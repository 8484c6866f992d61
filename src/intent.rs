//! Message intent: the typed purpose the conversation controller dispatches on.
//!
//! The controller only consumes [`Intent`]; where it comes from is behind
//! [`IntentClassifier`]. [`RuleBasedClassifier`] is a fast regex classifier
//! for hosts without an NLU service.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classified purpose of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Search { query: String },
    SkipAndSearch { query: String },
    ProfileUpdate,
    SkipProfile,
    Affirmative,
    Casual,
    Other,
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::SkipAndSearch { .. } => "skip_and_search",
            Self::ProfileUpdate => "profile_update",
            Self::SkipProfile => "skip_profile",
            Self::Affirmative => "affirmative",
            Self::Casual => "casual",
            Self::Other => "other",
        }
    }

    /// Both search flavours.
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. } | Self::SkipAndSearch { .. })
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Search { query } | Self::SkipAndSearch { query } => Some(query),
            _ => None,
        }
    }
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> Intent;
}

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    SkipAndSearch,
    SkipProfile,
    ProfileUpdate,
    Affirmative,
    Casual,
    Search,
}

/// A single classification rule with a compiled regex.
#[derive(Debug, Clone)]
struct IntentRule {
    regex: Regex,
    kind: RuleKind,
}

/// Ordered regex rules; the first match wins, no match is `Intent::Other`.
pub struct RuleBasedClassifier {
    rules: Vec<IntentRule>,
}

impl RuleBasedClassifier {
    /// Create a classifier with the default rule set.
    pub fn default_rules() -> Self {
        let rules = vec![
            // "skip and search fintech founders"
            IntentRule {
                regex: Regex::new(r"(?i)^\s*skip\s+(and|&)\s+(search|find)\b\s*(?P<query>.*)$")
                    .unwrap(),
                kind: RuleKind::SkipAndSearch,
            },
            IntentRule {
                regex: Regex::new(r"(?i)^\s*(skip|later|not now|stop|maybe later)\b").unwrap(),
                kind: RuleKind::SkipProfile,
            },
            IntentRule {
                regex: Regex::new(r"(?i)\b(update|complete|edit|finish)\s+(my\s+)?profile\b")
                    .unwrap(),
                kind: RuleKind::ProfileUpdate,
            },
            IntentRule {
                regex: Regex::new(
                    r"(?i)^\s*(yes|y|yeah|yep|sure|ok|okay|of course|let'?s go)\s*[.!]*\s*$",
                )
                .unwrap(),
                kind: RuleKind::Affirmative,
            },
            IntentRule {
                regex: Regex::new(
                    r"(?i)^\s*(hi|hello|hey|namaste|thanks|thank you|good (morning|afternoon|evening)|how are you)\b",
                )
                .unwrap(),
                kind: RuleKind::Casual,
            },
            IntentRule {
                regex: Regex::new(
                    r"(?i)\b(find|search|looking for|look for|need|want|connect me|who (is|are|can)|any(one)?\s+(in|from|working)|experts?|developers?|mentors?|founders?|consultants?)\b",
                )
                .unwrap(),
                kind: RuleKind::Search,
            },
        ];
        Self { rules }
    }

    /// Classify `message` against the rules.
    pub fn evaluate(&self, message: &str) -> Intent {
        let trimmed = message.trim();
        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(trimmed) else {
                continue;
            };
            let intent = match rule.kind {
                RuleKind::SkipAndSearch => Intent::SkipAndSearch {
                    query: caps
                        .name("query")
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default(),
                },
                RuleKind::SkipProfile => Intent::SkipProfile,
                RuleKind::ProfileUpdate => Intent::ProfileUpdate,
                RuleKind::Affirmative => Intent::Affirmative,
                RuleKind::Casual => Intent::Casual,
                RuleKind::Search => Intent::Search {
                    query: trimmed.to_string(),
                },
            };
            debug!(intent = intent.kind(), "Rule matched");
            return intent;
        }
        Intent::Other
    }
}

#[async_trait]
impl IntentClassifier for RuleBasedClassifier {
    async fn classify(&self, message: &str) -> Intent {
        self.evaluate(message)
    }
}
