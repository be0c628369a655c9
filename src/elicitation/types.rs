// Elicitation records - Persona, Interview, EvaluationResult, WorkflowConfig

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_PERSONA_COUNT};

/// A synthetic interview subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub background: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
        }
    }
}

/// One question/answer exchange with a persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub persona: Persona,
    pub question: String,
    pub answer: String,
}

/// Verdict on whether the interviews gathered so far are enough to write
/// the requirements document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub reason: String,
    pub sufficient: bool,
}

/// Configuration for one workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Personas requested per cycle; also the size of the interview slice
    pub persona_count: usize,
    /// Hard cap on generate → interview → evaluate cycles
    pub max_iterations: u32,
    /// Timeout applied to each joint interview batch await
    pub batch_timeout: Option<Duration>,
    /// Language the requirements document is written in
    pub language: Option<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            persona_count: DEFAULT_PERSONA_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            batch_timeout: None,
            language: None,
        }
    }
}
