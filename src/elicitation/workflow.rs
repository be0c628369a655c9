// Workflow engine - drives the elicitation stage graph
//
//   GeneratePersonas → ConductInterviews → EvaluateSufficiency
//        ↑                                        │
//        └──── not sufficient, under the cap ─────┤
//                                                 ↓
//                                         GenerateDocument → Terminal
//
// Stages run strictly one after another. Each returns a `StateUpdate` which
// the engine merges before asking `next_stage` where to go.

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::document::DocumentSynthesizer;
use super::error::{StageFailure, WorkflowError};
use super::evaluator::SufficiencyEvaluator;
use super::interviews::InterviewSimulator;
use super::personas::PersonaGenerator;
use super::state::{StateUpdate, WorkflowState};
use super::types::WorkflowConfig;
use crate::generation::GenerationService;

/// A node in the stage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    GeneratePersonas,
    ConductInterviews,
    EvaluateSufficiency,
    GenerateDocument,
    Terminal,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneratePersonas => "generate_personas",
            Self::ConductInterviews => "conduct_interviews",
            Self::EvaluateSufficiency => "evaluate_sufficiency",
            Self::GenerateDocument => "generate_document",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transition table.
///
/// Called after `stage`'s update has been merged into `state`. The only
/// conditional edge leaves `EvaluateSufficiency`: loop back while the
/// interviews are insufficient and fewer than `max_iterations` cycles ran.
pub fn next_stage(stage: Stage, state: &WorkflowState, max_iterations: u32) -> Stage {
    match stage {
        Stage::GeneratePersonas => Stage::ConductInterviews,
        Stage::ConductInterviews => Stage::EvaluateSufficiency,
        Stage::EvaluateSufficiency => {
            if !state.sufficient && state.iteration < max_iterations {
                Stage::GeneratePersonas
            } else {
                Stage::GenerateDocument
            }
        }
        Stage::GenerateDocument | Stage::Terminal => Stage::Terminal,
    }
}

/// One configured elicitation pipeline.
///
/// Cheap to reuse: every `run` starts from a fresh `WorkflowState`.
pub struct Workflow {
    personas: PersonaGenerator,
    interviews: InterviewSimulator,
    evaluator: SufficiencyEvaluator,
    document: DocumentSynthesizer,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(service: Arc<dyn GenerationService>, mut config: WorkflowConfig) -> Self {
        // At least one cycle always runs, with at least one persona
        config.max_iterations = config.max_iterations.max(1);
        config.persona_count = config.persona_count.max(1);

        tracing::debug!(
            service = service.name(),
            persona_count = config.persona_count,
            max_iterations = config.max_iterations,
            "Workflow configured"
        );

        Self {
            personas: PersonaGenerator::new(Arc::clone(&service)),
            interviews: InterviewSimulator::new(Arc::clone(&service))
                .with_batch_timeout(config.batch_timeout),
            evaluator: SufficiencyEvaluator::new(Arc::clone(&service)),
            document: DocumentSynthesizer::new(service).with_language(config.language.clone()),
            config,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run the workflow and return the requirements document.
    pub async fn run(&self, user_request: &str) -> Result<String, WorkflowError> {
        self.run_to_state(user_request)
            .await
            .map(|state| state.requirements_doc)
    }

    /// Run the workflow and return the final state (personas, interviews,
    /// last verdict and document).
    pub async fn run_to_state(&self, user_request: &str) -> Result<WorkflowState, WorkflowError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", %run_id);
        self.drive(WorkflowState::new(user_request))
            .instrument(span)
            .await
    }

    async fn drive(&self, mut state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        let mut stage = Stage::GeneratePersonas;
        tracing::info!(user_request = %state.user_request, "Workflow started");

        while stage != Stage::Terminal {
            let update = match self.execute(stage, &state).await {
                Ok(update) => update,
                Err(cause) => {
                    tracing::error!(
                        %stage,
                        iteration = state.iteration,
                        error = %cause,
                        "Stage failed, aborting run"
                    );
                    return Err(WorkflowError::StageFailed {
                        stage,
                        iteration: state.iteration,
                        cause,
                        state: Box::new(state),
                    });
                }
            };

            let touched = update.fields();
            state.apply(update);

            let next = next_stage(stage, &state, self.config.max_iterations);
            tracing::info!(
                %stage,
                next = %next,
                fields = ?touched,
                iteration = state.iteration,
                personas = state.personas.len(),
                interviews = state.interviews.len(),
                "Stage complete"
            );
            stage = next;
        }

        if state.requirements_doc.is_empty() {
            return Err(WorkflowError::IterationCapReachedWithoutDocument {
                iteration: state.iteration,
                state: Box::new(state),
            });
        }

        tracing::info!(
            iterations = state.iteration,
            sufficient = state.sufficient,
            "Workflow finished"
        );
        Ok(state)
    }

    /// Run one stage against a read-only view of the state
    async fn execute(
        &self,
        stage: Stage,
        state: &WorkflowState,
    ) -> Result<StateUpdate, StageFailure> {
        match stage {
            Stage::GeneratePersonas => {
                let personas = self
                    .personas
                    .generate(&state.user_request, self.config.persona_count)
                    .await
                    .map_err(StageFailure::Generation)?;
                Ok(StateUpdate::personas(personas))
            }
            Stage::ConductInterviews => {
                let batch = state.latest_personas(self.config.persona_count);
                let interviews = self.interviews.run(&state.user_request, batch).await?;
                Ok(StateUpdate::interviews(interviews))
            }
            Stage::EvaluateSufficiency => {
                let result = self
                    .evaluator
                    .evaluate(&state.user_request, &state.interviews)
                    .await?;
                if !result.sufficient {
                    tracing::info!(reason = %result.reason, "Interviews insufficient");
                }
                Ok(StateUpdate::evaluation(result))
            }
            Stage::GenerateDocument => {
                let document = self
                    .document
                    .synthesize(&state.user_request, &state.interviews)
                    .await
                    .map_err(StageFailure::Generation)?;
                Ok(StateUpdate::document(document))
            }
            Stage::Terminal => Ok(StateUpdate::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(iteration: u32, sufficient: bool) -> WorkflowState {
        let mut state = WorkflowState::new("r");
        state.iteration = iteration;
        state.sufficient = sufficient;
        state
    }

    #[test]
    fn test_unconditional_edges() {
        let s = state(1, false);
        assert_eq!(next_stage(Stage::GeneratePersonas, &s, 5), Stage::ConductInterviews);
        assert_eq!(next_stage(Stage::ConductInterviews, &s, 5), Stage::EvaluateSufficiency);
        assert_eq!(next_stage(Stage::GenerateDocument, &s, 5), Stage::Terminal);
        assert_eq!(next_stage(Stage::Terminal, &s, 5), Stage::Terminal);
    }

    #[test]
    fn test_loop_back_while_insufficient_under_cap() {
        for iteration in 1..5 {
            assert_eq!(
                next_stage(Stage::EvaluateSufficiency, &state(iteration, false), 5),
                Stage::GeneratePersonas,
                "iteration {iteration}"
            );
        }
    }

    #[test]
    fn test_cap_routes_to_document() {
        assert_eq!(
            next_stage(Stage::EvaluateSufficiency, &state(5, false), 5),
            Stage::GenerateDocument
        );
        assert_eq!(
            next_stage(Stage::EvaluateSufficiency, &state(1, false), 1),
            Stage::GenerateDocument
        );
    }

    #[test]
    fn test_sufficient_routes_to_document() {
        for iteration in 1..=5 {
            assert_eq!(
                next_stage(Stage::EvaluateSufficiency, &state(iteration, true), 5),
                Stage::GenerateDocument
            );
        }
    }

    #[test]
    fn test_loop_always_terminates() {
        // Simulate an evaluator that is never satisfied
        let mut s = WorkflowState::new("r");
        let mut stage = Stage::GeneratePersonas;
        let mut cycles = 0;
        while stage != Stage::Terminal {
            if stage == Stage::GeneratePersonas {
                s.apply(StateUpdate::personas(vec![]));
                cycles += 1;
            }
            stage = next_stage(stage, &s, 5);
            assert!(cycles <= 5);
        }
        assert_eq!(cycles, 5);
        assert_eq!(s.iteration, 5);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::GeneratePersonas.to_string(), "generate_personas");
        assert_eq!(Stage::EvaluateSufficiency.to_string(), "evaluate_sufficiency");
    }
}
