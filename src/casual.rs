//! Replies to small talk.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::structured::best_effort;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// What the responder knows about the person it is talking to.
#[derive(Debug, Clone)]
pub struct CasualContext {
    pub name: String,
    pub profile_complete: bool,
    pub completion_percentage: u8,
}

#[async_trait]
pub trait CasualResponder: Send + Sync {
    async fn respond(&self, message: &str, context: &CasualContext) -> String;
}

/// Fixed replies keyed on a few greetings.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn reply(message: &str, context: &CasualContext) -> String {
        let lower = message.to_lowercase();
        let name = &context.name;
        if lower.contains("thank") {
            format!("You're welcome, {name}! 😊 Happy to help anytime.")
        } else if lower.contains("how are you") {
            format!("I'm doing great, thanks for asking, {name}! 🌟 How can I help you today?")
        } else if context.profile_complete {
            format!(
                "Hi {name}! 👋\n\nI'm here to help you connect with our alumni network. \
                 Tell me what expertise you're looking for."
            )
        } else {
            format!("Hi {name}! 👋\n\nI'm here to help you connect with our alumni network.")
        }
    }
}

#[async_trait]
impl CasualResponder for CannedResponder {
    async fn respond(&self, message: &str, context: &CasualContext) -> String {
        Self::reply(message, context)
    }
}

const CASUAL_SYSTEM_PROMPT: &str = "You are the friendly assistant of an alumni network on WhatsApp. \
Reply to small talk in at most two short sentences, warm and professional, with at most one emoji. \
Gently remind the user that you can help them find fellow alumni by expertise.";

/// Model-written small talk, falling back to [`CannedResponder`].
pub struct LlmCasualResponder {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl LlmCasualResponder {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }
}

#[async_trait]
impl CasualResponder for LlmCasualResponder {
    async fn respond(&self, message: &str, context: &CasualContext) -> String {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(CASUAL_SYSTEM_PROMPT),
            ChatMessage::user(format!("User {} says: \"{message}\"", context.name)),
        ])
        .with_max_tokens(120)
        .with_temperature(0.7);

        let attempt = async {
            let response = self.llm.complete(request).await?;
            let text = response.content.trim().to_string();
            if text.is_empty() {
                return Err(crate::error::LlmError::InvalidResponse {
                    provider: self.llm.model_name().to_string(),
                    reason: "empty casual reply".to_string(),
                });
            }
            Ok(text)
        };

        best_effort("casual_reply", self.timeout, attempt, || {
            CannedResponder::reply(message, context)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{CompletionResponse, FinishReason};

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "failing".into(),
                reason: "offline".into(),
            })
        }
    }

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, _req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: "  Hello from the network!  ".into(),
                input_tokens: 1,
                output_tokens: 1,
                finish_reason: FinishReason::Stop,
                response_id: None,
            })
        }
    }

    fn context() -> CasualContext {
        CasualContext {
            name: "Asha".into(),
            profile_complete: false,
            completion_percentage: 54,
        }
    }

    #[tokio::test]
    async fn canned_replies_use_name() {
        let reply = CannedResponder.respond("thanks!", &context()).await;
        assert!(reply.contains("Asha"));
        assert!(reply.contains("welcome"));
    }

    #[tokio::test]
    async fn llm_reply_is_trimmed() {
        let responder = LlmCasualResponder::new(Arc::new(EchoLlm), Duration::from_secs(5));
        assert_eq!(
            responder.respond("hi", &context()).await,
            "Hello from the network!"
        );
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_canned() {
        let responder = LlmCasualResponder::new(Arc::new(FailingLlm), Duration::from_secs(5));
        let reply = responder.respond("hi", &context()).await;
        assert!(reply.starts_with("Hi Asha!"));
    }
}
