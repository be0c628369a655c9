// Typed failures for every workflow component.
//
// Each stage wraps the failure below it, so a `WorkflowError` carries the
// full chain: stage → component error → service/extraction error.

use std::fmt;
use thiserror::Error;

use super::extract::RecordKind;
use super::state::WorkflowState;
use super::workflow::Stage;
use crate::generation::ServiceError;

/// Coarse classification of an extraction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    Malformed,
    LengthMismatch,
}

/// Generated text did not match the requested schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Unparsable payload, missing key or wrong value type
    #[error("malformed {schema} payload: {detail}")]
    Malformed {
        schema: RecordKind,
        detail: String,
        raw: String,
    },

    /// Parallel persona arrays of different lengths
    #[error("{schema} payload has {names} names but {backgrounds} backgrounds")]
    LengthMismatch {
        schema: RecordKind,
        names: usize,
        backgrounds: usize,
        raw: String,
    },
}

impl ExtractionError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            Self::Malformed { .. } => ExtractionErrorKind::Malformed,
            Self::LengthMismatch { .. } => ExtractionErrorKind::LengthMismatch,
        }
    }

    /// The generated text that failed to extract
    pub fn raw(&self) -> &str {
        match self {
            Self::Malformed { raw, .. } | Self::LengthMismatch { raw, .. } => raw,
        }
    }
}

/// Persona generation or document synthesis failed
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service failed")]
    ServiceFailure(#[from] ServiceError),

    #[error("generated text could not be extracted")]
    ExtractionFailure(#[from] ExtractionError),
}

/// Which half of the interview batch was running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewPhase {
    Questions,
    Answers,
}

impl fmt::Display for InterviewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Questions => f.write_str("questions"),
            Self::Answers => f.write_str("answers"),
        }
    }
}

/// An interview batch failed; no partial interviews are returned
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("interview batch failed while generating {phase}")]
    BatchFailure {
        phase: InterviewPhase,
        #[source]
        source: ServiceError,
    },
}

/// Sufficiency judgment or its extraction failed
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("generation service failed")]
    ServiceFailure(#[from] ServiceError),

    #[error("judgment could not be extracted")]
    ExtractionFailure(#[from] ExtractionError),
}

/// The component error behind a failed stage
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Generation(GenerationError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// A workflow run did not produce a document
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A stage failed; the run was aborted with the state as it stood
    #[error("{stage} stage failed at iteration {iteration}")]
    StageFailed {
        stage: Stage,
        iteration: u32,
        #[source]
        cause: StageFailure,
        state: Box<WorkflowState>,
    },

    /// Reached the terminal stage with no document
    #[error("workflow ended after {iteration} iterations without a requirements document")]
    IterationCapReachedWithoutDocument {
        iteration: u32,
        state: Box<WorkflowState>,
    },
}

impl WorkflowError {
    /// State at the moment the run stopped (for diagnostics)
    pub fn state(&self) -> &WorkflowState {
        match self {
            Self::StageFailed { state, .. } | Self::IterationCapReachedWithoutDocument { state, .. } => {
                state
            }
        }
    }

    pub fn iteration(&self) -> u32 {
        match self {
            Self::StageFailed { iteration, .. }
            | Self::IterationCapReachedWithoutDocument { iteration, .. } => *iteration,
        }
    }

    /// Stage that failed, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            Self::IterationCapReachedWithoutDocument { .. } => None,
        }
    }
}
