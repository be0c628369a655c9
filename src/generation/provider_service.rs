// GenerationService backed by a configured LLM provider

use async_trait::async_trait;
use std::sync::Arc;

use super::{GenerationService, Prompt, ServiceError};
use crate::config::constants::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_TOKENS};
use crate::config::RunSettings;
use crate::providers::{LlmProvider, Message, ProviderRequest};

/// Adapts an `LlmProvider` to the `GenerationService` interface, applying
/// the run's sampling settings to every request.
pub struct ProviderService {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f32>,
    max_tokens: u32,
    max_concurrency: usize,
}

impl ProviderService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn from_settings(provider: Arc<dyn LlmProvider>, run: &RunSettings) -> Self {
        Self {
            provider,
            temperature: run.temperature,
            max_tokens: run.max_tokens,
            max_concurrency: run.batch_concurrency,
        }
    }

    fn to_request(&self, prompt: &Prompt) -> ProviderRequest {
        let mut request = ProviderRequest::new(vec![Message::user(prompt.user.clone())])
            .with_system(prompt.system.clone())
            .with_max_tokens(self.max_tokens);
        if let Some(t) = self.temperature {
            request = request.with_temperature(t);
        }
        request
    }
}

#[async_trait]
impl GenerationService for ProviderService {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ServiceError> {
        let request = self.to_request(prompt);

        tracing::debug!(
            kind = %prompt.kind,
            provider = self.provider.name(),
            prompt_chars = prompt.system.len() + prompt.user.len(),
            "Dispatching generation request"
        );

        let response = self
            .provider
            .send_message(&request)
            .await
            .map_err(ServiceError::request)?;

        if response.is_truncated() {
            tracing::warn!(
                kind = %prompt.kind,
                max_tokens = self.max_tokens,
                "Generation hit the token limit; output may be cut short"
            );
        }

        if response.text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse { kind: prompt.kind });
        }

        Ok(response.text)
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
