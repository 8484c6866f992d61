//! Best-effort structured extraction from model output.
//!
//! Every AI-assisted decision in the bot goes through [`best_effort`]: the
//! call is bounded by a timeout, its output is shape-checked by the caller's
//! parser, and any failure resolves to a deterministic fallback. Failures
//! are logged, never surfaced to the user.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::LlmError;

/// Run `attempt` under `timeout`; on error or timeout return `fallback()`.
pub async fn best_effort<T, Fut, F>(
    operation: &'static str,
    timeout: Duration,
    attempt: Fut,
    fallback: F,
) -> T
where
    Fut: Future<Output = Result<T, LlmError>>,
    F: FnOnce() -> T,
{
    match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!(operation, error = %e, "AI call failed, using deterministic fallback");
            fallback()
        }
        Err(_) => {
            warn!(
                operation,
                timeout_secs = timeout.as_secs(),
                "AI call timed out, using deterministic fallback"
            );
            fallback()
        }
    }
}

/// Extract a JSON array from LLM output, stripping markdown fences and
/// surrounding prose.
pub fn extract_json_array(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('[') {
                return inner;
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Parse a non-empty JSON array of strings out of model output.
pub fn parse_string_array(provider: &str, text: &str) -> Result<Vec<String>, LlmError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(extract_json_array(text))?;
    let strings: Vec<String> = values
        .into_iter()
        .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect();

    if strings.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason: "expected a non-empty array of strings".to_string(),
        });
    }
    Ok(strings)
}
