// Requirements elicitation - personas, interviews, a sufficiency loop and a
// synthesized requirements document
//
// `Workflow` is the entry point. It owns a `WorkflowState` for one run and
// drives the four stage components over a shared `GenerationService`.

pub mod document;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod interviews;
pub mod personas;
pub mod prompts;
pub mod state;
pub mod types;
pub mod workflow;

pub use document::DocumentSynthesizer;
pub use error::{
    EvaluationError, ExtractionError, ExtractionErrorKind, GenerationError, InterviewPhase,
    SimulationError, StageFailure, WorkflowError,
};
pub use evaluator::SufficiencyEvaluator;
pub use extract::{extract, extract_personas, extract_sufficiency, Record, RecordKind};
pub use interviews::InterviewSimulator;
pub use personas::PersonaGenerator;
pub use state::{Field, Reducer, StateUpdate, WorkflowState};
pub use types::{EvaluationResult, Interview, Persona, WorkflowConfig};
pub use workflow::{next_stage, Stage, Workflow};
