// OpenAI API provider implementation
//
// Works for OpenAI itself and every backend that speaks the same
// chat-completions format (Grok, Mistral, Groq, Ollama).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, ApiStatusError, RetryPolicy};
use super::types::{ProviderRequest, ProviderResponse};
use super::LlmProvider;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// OpenAI-compatible API provider
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    provider_name: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    pub fn new_openai(api_key: String) -> Result<Self> {
        Self::new(
            Some(api_key),
            "https://api.openai.com".to_string(),
            "gpt-4o".to_string(),
            "openai".to_string(),
        )
    }

    pub fn new_grok(api_key: String) -> Result<Self> {
        Self::new(
            Some(api_key),
            "https://api.x.ai".to_string(),
            "grok-2".to_string(),
            "grok".to_string(),
        )
    }

    pub fn new_mistral(api_key: String) -> Result<Self> {
        Self::new(
            Some(api_key),
            "https://api.mistral.ai".to_string(),
            "mistral-large-latest".to_string(),
            "mistral".to_string(),
        )
    }

    /// Groq (by Groq Inc), not Grok (by X.AI)
    pub fn new_groq(api_key: String) -> Result<Self> {
        Self::new(
            Some(api_key),
            "https://api.groq.com/openai".to_string(),
            "llama-3.1-70b-versatile".to_string(),
            "groq".to_string(),
        )
    }

    /// Local Ollama server; no API key required
    pub fn new_ollama(base_url: Option<String>, model: String) -> Result<Self> {
        Self::new(
            None,
            base_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
            model,
            "ollama".to_string(),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at a different endpoint (self-hosted gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn new(
        api_key: Option<String>,
        base_url: String,
        default_model: String,
        provider_name: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            default_model,
            provider_name,
            retry: RetryPolicy::default(),
        })
    }

    /// Convert ProviderRequest to OpenAI API format
    fn to_openai_request(&self, request: &ProviderRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        // System prompt goes first as a {"role":"system"} message
        if let Some(system) = &request.system {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        messages.extend(request.messages.iter().map(|m| OpenAIMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        }));

        OpenAIRequest {
            model: request.model_or(&self.default_model).to_string(),
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
        }
    }

    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ProviderResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("OpenAI returned no choices in response")?;

        Ok(ProviderResponse {
            id: response.id,
            model: response.model,
            text: choice.message.content.unwrap_or_default(),
            stop_reason: choice.finish_reason,
            provider: self.provider_name.clone(),
        })
    }

    /// Send a single message request (no retry)
    async fn send_message_once(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let openai_request = self.to_openai_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            provider = %self.provider_name,
            model = %openai_request.model,
            messages = openai_request.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&openai_request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {} API", self.provider_name))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError::new(&self.provider_name, status, error_body).into());
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} API response", self.provider_name))?;

        tracing::debug!(id = %openai_response.id, "Received chat completion response");

        self.from_openai_response(openai_response)
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        with_retry(self.retry, || self.send_message_once(request)).await
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    id: String,
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
