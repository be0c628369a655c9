// Unified request/response types for multi-provider LLM support
//
// These types abstract over provider-specific formats (OpenAI-compatible,
// Anthropic) so the generation layer can talk to any backend the same way.

use serde::{Deserialize, Serialize};

/// A single conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Unified request format for all LLM providers
///
/// Each provider implementation transforms this into its own API format.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// Conversation messages
    pub messages: Vec<Message>,

    /// Model name (empty = provider default)
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// System prompt (sent as `system` for Claude, prepended as a
    /// `{"role":"system"}` message for OpenAI-compatible providers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Temperature (optional, provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Create a new request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: crate::config::constants::DEFAULT_MAX_TOKENS,
            system: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Resolve the model to send: the request's own, or the provider default.
    pub fn model_or<'a>(&'a self, default_model: &'a str) -> &'a str {
        if self.model.is_empty() {
            default_model
        } else {
            &self.model
        }
    }
}

/// Unified response format from all LLM providers
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Response ID (provider-specific)
    pub id: String,

    /// Model that generated the response
    pub model: String,

    /// Concatenated text content of the response
    pub text: String,

    /// Why generation stopped ("end_turn", "stop", "max_tokens", ...)
    pub stop_reason: Option<String>,

    /// Provider that generated this response ("openai", "claude", ...)
    pub provider: String,
}

impl ProviderResponse {
    /// True when the provider cut the output short at the token limit.
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.stop_reason.as_deref(),
            Some("max_tokens") | Some("length")
        )
    }
}
