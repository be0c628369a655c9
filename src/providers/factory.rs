// Provider factory
//
// Creates LLM providers from the configured provider entry

use anyhow::Result;

use super::claude::ClaudeProvider;
use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::ProviderEntry;

/// Create an `LlmProvider` from a `ProviderEntry`.
pub fn create_provider_from_entry(entry: &ProviderEntry) -> Result<Box<dyn LlmProvider>> {
    match entry {
        ProviderEntry::Claude {
            api_key,
            model,
            base_url,
        } => {
            let mut provider = ClaudeProvider::new(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Openai {
            api_key,
            model,
            base_url,
        } => {
            let mut provider = OpenAIProvider::new_openai(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Grok { api_key, model } => {
            let mut provider = OpenAIProvider::new_grok(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Mistral { api_key, model } => {
            let mut provider = OpenAIProvider::new_mistral(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Groq { api_key, model } => {
            let mut provider = OpenAIProvider::new_groq(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Ok(Box::new(provider))
        }

        ProviderEntry::Ollama { model, base_url } => Ok(Box::new(OpenAIProvider::new_ollama(
            base_url.clone(),
            model.clone(),
        )?)),
    }
}
