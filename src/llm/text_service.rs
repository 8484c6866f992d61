//! AI text operations used by validation and search.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::profile::geography::{GeoKind, GeoVerdict};
use crate::search::ranking::CandidateSummary;

use super::provider::{ChatMessage, CompletionRequest, LlmProvider};
use super::structured::parse_string_array;

/// The three model-backed decisions the bot makes. Each has a
/// deterministic fallback at its call site.
#[async_trait]
pub trait AiTextService: Send + Sync {
    /// 8–12 search keywords for a free-text query.
    async fn extract_keywords(&self, query: &str) -> Result<Vec<String>, LlmError>;

    /// Candidate keys (emails) in rank order.
    async fn rank_candidates(
        &self,
        candidates: &[CandidateSummary],
        query: &str,
        keywords: &[String],
        max_results: usize,
    ) -> Result<Vec<String>, LlmError>;

    /// Whether `text` names a real place of the given kind.
    async fn classify_geography(&self, text: &str, kind: GeoKind) -> Result<GeoVerdict, LlmError>;
}

const KEYWORD_SYSTEM_PROMPT: &str = r#"Extract relevant search keywords from user queries for professional alumni networking.

Rules:
- Return 8-12 keywords/phrases that help find relevant professionals
- Include synonyms, related terms, and domain-specific language
- Focus on skills, roles, industries, and expertise areas
- Return as JSON array of strings only, no other text or formatting

Examples:
"web development help" → ["web development", "frontend", "backend", "javascript", "react", "nodejs", "programming", "developer", "software", "coding"]
"marketing expert" → ["marketing", "digital marketing", "advertising", "branding", "social media", "growth", "strategy", "promotion", "campaigns", "expert"]"#;

/// `AiTextService` backed by a chat model.
pub struct LlmTextService {
    llm: Arc<dyn LlmProvider>,
}

impl LlmTextService {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    fn ranking_prompt(max_results: usize) -> String {
        format!(
            "Select the TOP {max_results} MOST RELEVANT alumni profiles for the user's query.\n\n\
             Ranking Criteria:\n\
             1. Direct skill/expertise match\n\
             2. Professional role relevance\n\
             3. Industry domain alignment\n\
             4. Geographic relevance (if specified)\n\
             5. Community contributions that match needs\n\
             6. Profile completeness and activity\n\n\
             Return ONLY a JSON array of the {max_results} most relevant profile emails in order \
             of relevance, no other text or formatting:\n\
             [\"email1@example.com\", \"email2@example.com\", ...]"
        )
    }

    fn geography_prompt(kind: GeoKind) -> String {
        let label = kind.label();
        format!(
            "You are a strict geographic validation expert.\n\n\
             STRICT VALIDATION RULES:\n\
             - Return \"VALID\" ONLY for real, existing {label} names\n\
             - Return \"INVALID\" for anything that is NOT a real {label}\n\
             - Person names, placeholders, random words and typos are INVALID\n\n\
             Respond with exactly one word: VALID or INVALID.\n\
             Be STRICT but fair. When in doubt about borderline cases, prefer INVALID."
        )
    }
}

#[async_trait]
impl AiTextService for LlmTextService {
    async fn extract_keywords(&self, query: &str) -> Result<Vec<String>, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(KEYWORD_SYSTEM_PROMPT),
            ChatMessage::user(format!("Extract keywords from: \"{query}\"")),
        ])
        .with_max_tokens(300)
        .with_temperature(0.3);

        let response = self.llm.complete(request).await?;
        parse_string_array(self.llm.model_name(), &response.content)
    }

    async fn rank_candidates(
        &self,
        candidates: &[CandidateSummary],
        query: &str,
        keywords: &[String],
        max_results: usize,
    ) -> Result<Vec<String>, LlmError> {
        let profiles = serde_json::to_string_pretty(candidates)?;
        let request = CompletionRequest::new(vec![
            ChatMessage::system(Self::ranking_prompt(max_results)),
            ChatMessage::user(format!(
                "User query: \"{query}\"\nKeywords: {}\n\nProfiles to rank:\n{profiles}",
                keywords.join(", ")
            )),
        ])
        .with_max_tokens(300)
        .with_temperature(0.1);

        let response = self.llm.complete(request).await?;
        parse_string_array(self.llm.model_name(), &response.content)
    }

    async fn classify_geography(&self, text: &str, kind: GeoKind) -> Result<GeoVerdict, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(Self::geography_prompt(kind)),
            ChatMessage::user(format!("Validate this {}: \"{text}\"", kind.label())),
        ])
        .with_max_tokens(20)
        .with_temperature(0.1);

        let response = self.llm.complete(request).await?;
        match response.content.trim().trim_matches('"').to_uppercase().as_str() {
            "VALID" => Ok(GeoVerdict::Valid),
            "INVALID" => Ok(GeoVerdict::Invalid),
            other => Err(LlmError::InvalidResponse {
                provider: self.llm.model_name().to_string(),
                reason: format!("expected VALID or INVALID, got {other:?}"),
            }),
        }
    }
}
