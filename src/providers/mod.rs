// Multi-provider LLM support
//
// This module provides an abstraction layer over different LLM providers
// (Claude, OpenAI, Grok, Mistral, Groq, Ollama) so the generation layer can
// use whichever API the user configured through one interface.

use anyhow::Result;
use async_trait::async_trait;

pub mod claude;
pub mod factory;
pub mod openai;
pub mod retry;
pub mod types;

pub use claude::ClaudeProvider;
pub use factory::create_provider_from_entry;
pub use openai::OpenAIProvider;
pub use retry::{is_retryable, with_retry, ApiStatusError, RetryPolicy};
pub use types::{Message, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// All LLM providers implement this trait, providing a unified interface
/// for sending messages.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "claude", "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
