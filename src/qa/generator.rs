use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::errors::ApiError;
use crate::llm::provider::LlmProvider;
use crate::llm::types::{ChatMessage, ChatRequest};

/// Produces an answer for a fully assembled prompt. The pipeline only sees
/// this seam, never the chat model behind it.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

pub struct LlmAnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    model_id: String,
    timeout: Duration,
    temperature: Option<f64>,
    max_tokens: Option<i32>,
}

impl LlmAnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model_id: &str, timeout: Duration) -> Self {
        Self {
            provider,
            model_id: model_id.to_string(),
            timeout,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Applies config-supplied sampling overrides to every turn.
    pub fn with_sampling(mut self, temperature: Option<f64>, max_tokens: Option<i32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    /// One shot per turn, no retries. A turn that outlives the deadline
    /// fails with `GenerationFailed`.
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_sampling(self.temperature, self.max_tokens);

        match tokio::time::timeout(self.timeout, self.provider.chat(request, &self.model_id)).await
        {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(err)) => Err(ApiError::GenerationFailed(err.to_string())),
            Err(_) => Err(ApiError::GenerationFailed(format!(
                "model did not answer within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
