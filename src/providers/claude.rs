// Anthropic Messages API provider

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, ApiStatusError, RetryPolicy};
use super::types::{Message, ProviderRequest, ProviderResponse};
use super::LlmProvider;

const CLAUDE_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    retry: RetryPolicy,
}

impl ClaudeProvider {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: CLAUDE_API_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn to_claude_request<'a>(&'a self, request: &'a ProviderRequest) -> ClaudeRequest<'a> {
        ClaudeRequest {
            model: request.model_or(&self.default_model),
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: &request.messages,
            temperature: request.temperature,
        }
    }

    /// Send a single message request (no retry)
    async fn send_message_once(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let claude_request = self.to_claude_request(request);
        let url = format!("{}/v1/messages", self.base_url);

        tracing::debug!(
            model = %claude_request.model,
            messages = claude_request.messages.len(),
            "Sending request to Claude API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&claude_request)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError::new("Claude", status, error_body).into());
        }

        let claude_response: ClaudeResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        tracing::debug!(id = %claude_response.id, "Received Claude response");

        Ok(claude_response.into_provider_response())
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        with_retry(self.retry, || self.send_message_once(request)).await
    }

    fn name(&self) -> &str {
        "claude"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    id: String,
    model: String,
    content: Vec<ClaudeContentBlock>,
    stop_reason: Option<String>,
}

/// Content block; only text blocks matter here, anything else is skipped
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClaudeContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl ClaudeResponse {
    fn into_provider_response(self) -> ProviderResponse {
        let text = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ClaudeContentBlock::Text { text } => Some(text),
                ClaudeContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        ProviderResponse {
            id: self.id,
            model: self.model,
            text,
            stop_reason: self.stop_reason,
            provider: "claude".to_string(),
        }
    }
}
