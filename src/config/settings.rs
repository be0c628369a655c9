// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TOKENS, DEFAULT_PERSONA_COUNT,
};
use super::provider::ProviderEntry;
use crate::elicitation::WorkflowConfig;

/// Run parameters for one elicitation workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Personas generated per cycle
    pub persona_count: usize,

    /// Maximum generate → interview → evaluate cycles
    pub max_iterations: u32,

    /// Sampling temperature (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens per generation request
    pub max_tokens: u32,

    /// In-flight requests per interview batch
    pub batch_concurrency: usize,

    /// Timeout for one whole interview batch, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_timeout_secs: Option<u64>,

    /// Natural language the requirements document is written in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            persona_count: DEFAULT_PERSONA_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            batch_timeout_secs: None,
            language: None,
        }
    }
}

impl RunSettings {
    /// Workflow-engine view of these settings
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            persona_count: self.persona_count,
            max_iterations: self.max_iterations,
            batch_timeout: self.batch_timeout_secs.map(Duration::from_secs),
            language: self.language.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// LLM endpoint used for every generation request
    pub provider: ProviderEntry,

    /// Workflow parameters
    #[serde(default)]
    pub run: RunSettings,
}

impl Config {
    pub fn new(provider: ProviderEntry) -> Self {
        Self {
            provider,
            run: RunSettings::default(),
        }
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = self.provider.api_key() {
            if key.trim().is_empty() {
                bail!(
                    "{} provider has an empty api_key",
                    self.provider.display_name()
                );
            }
        }

        let run = &self.run;
        if run.persona_count == 0 {
            bail!("run.persona_count must be at least 1");
        }
        if run.max_iterations == 0 {
            bail!("run.max_iterations must be at least 1");
        }
        if run.batch_concurrency == 0 {
            bail!("run.batch_concurrency must be at least 1");
        }
        if run.max_tokens == 0 {
            bail!("run.max_tokens must be at least 1");
        }
        if let Some(t) = run.temperature {
            if !(0.0..=2.0).contains(&t) {
                bail!("run.temperature must be between 0.0 and 2.0 (got {t})");
            }
        }
        if run.batch_timeout_secs == Some(0) {
            bail!("run.batch_timeout_secs must be greater than 0 when set");
        }

        Ok(())
    }
}
