// Provider entry - which cloud or local LLM endpoint to talk to.

use serde::{Deserialize, Serialize};

/// A single provider entry.
///
/// Serializes with a `type` tag, e.g.:
/// ```toml
/// [provider]
/// type = "openai"
/// api_key = "sk-..."
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEntry {
    Claude {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Openai {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Grok {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Mistral {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Groq {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Ollama {
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl ProviderEntry {
    /// Human-readable name for logging.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Claude { .. } => "Claude",
            Self::Openai { .. } => "OpenAI",
            Self::Grok { .. } => "Grok",
            Self::Mistral { .. } => "Mistral",
            Self::Groq { .. } => "Groq",
            Self::Ollama { .. } => "Ollama",
        }
    }

    /// Model override, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Claude { model, .. }
            | Self::Openai { model, .. }
            | Self::Grok { model, .. }
            | Self::Mistral { model, .. }
            | Self::Groq { model, .. } => model.as_deref(),
            Self::Ollama { model, .. } => Some(model),
        }
    }

    /// API key, if the provider needs one.
    pub fn api_key(&self) -> Option<&str> {
        match self {
            Self::Claude { api_key, .. }
            | Self::Openai { api_key, .. }
            | Self::Grok { api_key, .. }
            | Self::Mistral { api_key, .. }
            | Self::Groq { api_key, .. } => Some(api_key),
            Self::Ollama { .. } => None,
        }
    }
}
