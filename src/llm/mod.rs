//! LLM integration for Alumni Assist.
//!
//! Uses the rig-core crate for HTTP transport and the `RigAdapter` to bridge
//! rig's `CompletionModel` trait to our `LlmProvider` trait. When no API key
//! is configured the bot runs without a provider and every AI-assisted
//! decision takes its deterministic path.

pub mod provider;
mod rig_adapter;
pub mod structured;
pub mod text_service;

pub use provider::*;
pub use rig_adapter::RigAdapter;
pub use text_service::{AiTextService, LlmTextService};

use std::sync::Arc;
use std::time::Duration;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Read from the environment. Returns `None` when `OPENAI_API_KEY` is unset.
    pub fn from_env(timeout: Duration) -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model = std::env::var("ALUMNI_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let base_url = std::env::var("ALUMNI_LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Some(Self {
            api_key: secrecy::SecretString::from(api_key),
            model,
            base_url,
            timeout,
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::builder()
            .api_key(config.api_key.expose_secret())
            .base_url(&config.base_url)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using OpenAI at {} (model: {})", config.base_url, config.model);
    Ok(Arc::new(RigAdapter::new(model, &config.model, config.timeout)))
}
