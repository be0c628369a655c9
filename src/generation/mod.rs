// Generation service - the text-completion capability every workflow stage
// consumes.
//
// Stages only see this trait: a single `complete` call plus an
// order-preserving `complete_batch` for independent prompts. Concrete LLM
// providers sit behind `ProviderService`.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::constants::DEFAULT_BATCH_CONCURRENCY;

pub mod provider_service;

pub use provider_service::ProviderService;

/// Which workflow step issued a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    PersonaBrainstorm,
    PersonaExtraction,
    InterviewQuestion,
    InterviewAnswer,
    SufficiencyJudgment,
    SufficiencyExtraction,
    RequirementsDocument,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonaBrainstorm => "persona_brainstorm",
            Self::PersonaExtraction => "persona_extraction",
            Self::InterviewQuestion => "interview_question",
            Self::InterviewAnswer => "interview_answer",
            Self::SufficiencyJudgment => "sufficiency_judgment",
            Self::SufficiencyExtraction => "sufficiency_extraction",
            Self::RequirementsDocument => "requirements_document",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (system prompt, user prompt) pair tagged with the step that built it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            kind,
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Failure of the generation service itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Transport, HTTP or provider-side failure (error chain flattened to text)
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation batch timed out after {0:?}")]
    Timeout(Duration),

    #[error("{kind} request returned no text")]
    EmptyResponse { kind: PromptKind },

    #[error("batch returned {got} results for {expected} prompts")]
    BatchLength { expected: usize, got: usize },
}

impl ServiceError {
    /// Wrap a provider error, keeping its full context chain
    pub fn request(err: anyhow::Error) -> Self {
        Self::Request(format!("{err:#}"))
    }
}

/// Text generation capability used by every stage.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Complete a single prompt
    async fn complete(&self, prompt: &Prompt) -> Result<String, ServiceError>;

    /// Complete independent prompts concurrently.
    ///
    /// Results are in input order regardless of completion order. The first
    /// failure fails the whole batch.
    async fn complete_batch(&self, prompts: &[Prompt]) -> Result<Vec<String>, ServiceError> {
        // Build the futures first so the boxed future stays `Send`
        let pending: Vec<_> = prompts.iter().map(|prompt| self.complete(prompt)).collect();
        stream::iter(pending)
            .buffered(self.max_concurrency().max(1))
            .try_collect()
            .await
    }

    /// Requests allowed in flight during `complete_batch`
    fn max_concurrency(&self) -> usize {
        DEFAULT_BATCH_CONCURRENCY
    }

    /// Name for logging
    fn name(&self) -> &str;
}
