// Integration tests for the elicitation workflow engine

mod common;

use std::sync::Arc;

use common::{ScriptFailure, ScriptedService};
use elicit::elicitation::{
    EvaluationError, ExtractionErrorKind, GenerationError, InterviewPhase, SimulationError, Stage,
    StageFailure, Workflow, WorkflowConfig, WorkflowError,
};
use elicit::generation::{PromptKind, ServiceError};

fn config(persona_count: usize) -> WorkflowConfig {
    WorkflowConfig {
        persona_count,
        ..WorkflowConfig::default()
    }
}

fn names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    names.into_iter().collect()
}

#[tokio::test]
async fn test_fitness_app_sufficient_on_first_cycle() {
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[true]));
    let workflow = Workflow::new(service.clone(), WorkflowConfig::default());

    let state = workflow.run_to_state("build a fitness app").await.unwrap();

    assert_eq!(state.user_request, "build a fitness app");
    assert_eq!(state.personas.len(), 2);
    assert_eq!(state.interviews.len(), 2);
    assert_eq!(state.iteration, 1);
    assert!(state.sufficient);
    assert!(!state.requirements_doc.is_empty());

    assert_eq!(service.calls(PromptKind::PersonaBrainstorm), 1);
    assert_eq!(service.calls(PromptKind::PersonaExtraction), 1);
    assert_eq!(service.calls(PromptKind::InterviewQuestion), 2);
    assert_eq!(service.calls(PromptKind::InterviewAnswer), 2);
    assert_eq!(service.calls(PromptKind::SufficiencyJudgment), 1);
    assert_eq!(service.calls(PromptKind::SufficiencyExtraction), 1);
    assert_eq!(service.calls(PromptKind::RequirementsDocument), 1);
}

#[tokio::test]
async fn test_run_returns_document_text() {
    let service = Arc::new(
        ScriptedService::new(2)
            .with_verdicts(&[true])
            .with_document("  # Fitness app requirements\n\n1. Project overview\n  "),
    );
    let workflow = Workflow::new(service, WorkflowConfig::default());

    let document = workflow.run("build a fitness app").await.unwrap();
    assert_eq!(document, "# Fitness app requirements\n\n1. Project overview");
}

#[tokio::test]
async fn test_never_sufficient_stops_at_iteration_cap() {
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[false]));
    let workflow = Workflow::new(service.clone(), config(2));

    let state = workflow.run_to_state("build a fitness app").await.unwrap();

    assert_eq!(state.iteration, 5);
    assert_eq!(state.personas.len(), 10);
    assert_eq!(state.interviews.len(), 10);
    assert!(!state.sufficient);
    assert_eq!(state.reason, "need more perspectives");
    assert!(!state.requirements_doc.is_empty());

    assert_eq!(service.calls(PromptKind::PersonaBrainstorm), 5);
    assert_eq!(service.calls(PromptKind::SufficiencyJudgment), 5);
    assert_eq!(service.calls(PromptKind::RequirementsDocument), 1);
}

#[tokio::test]
async fn test_loop_exits_when_evaluator_becomes_satisfied() {
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[false, false, true]));
    let workflow = Workflow::new(service.clone(), config(2));

    let state = workflow.run_to_state("build a fitness app").await.unwrap();

    assert_eq!(state.iteration, 3);
    assert_eq!(state.personas.len(), 6);
    assert_eq!(state.interviews.len(), 6);
    assert!(state.sufficient);
    assert_eq!(service.calls(PromptKind::SufficiencyJudgment), 3);
}

#[tokio::test]
async fn test_custom_iteration_cap() {
    let service = Arc::new(ScriptedService::new(1).with_verdicts(&[false]));
    let workflow = Workflow::new(
        service.clone(),
        WorkflowConfig {
            persona_count: 1,
            max_iterations: 2,
            ..WorkflowConfig::default()
        },
    );

    let state = workflow.run_to_state("r").await.unwrap();
    assert_eq!(state.iteration, 2);
    assert_eq!(service.calls(PromptKind::RequirementsDocument), 1);
}

#[tokio::test]
async fn test_history_is_append_only_and_fully_evaluated() {
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[false, false, true]));
    let workflow = Workflow::new(service.clone(), config(2));

    let state = workflow.run_to_state("build a fitness app").await.unwrap();

    // Personas keep generation order across cycles
    assert_eq!(
        state.personas.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        names(["P1", "P2", "P3", "P4", "P5", "P6"])
    );
    // Each cycle interviews only its own personas, appended in order
    assert_eq!(
        state
            .interviews
            .iter()
            .map(|i| i.persona.name.as_str())
            .collect::<Vec<_>>(),
        names(["P1", "P2", "P3", "P4", "P5", "P6"])
    );
    for interview in &state.interviews {
        assert_eq!(interview.question, format!("question for {}", interview.persona.name));
        assert_eq!(interview.answer, format!("answer from {}", interview.persona.name));
    }

    // Every judgment sees the whole history so far
    let judgments = service.prompts(PromptKind::SufficiencyJudgment);
    let seen: Vec<usize> = judgments
        .iter()
        .map(|p| p.user.matches("Persona: ").count())
        .collect();
    assert_eq!(seen, vec![2, 4, 6]);
    assert!(judgments[2].user.find("Persona: P1").unwrap() < judgments[2].user.find("Persona: P6").unwrap());

    assert!(state.requirements_doc.contains("Interviews used: 6"));
}

#[tokio::test]
async fn test_only_newest_personas_are_interviewed() {
    // Generator overshoots the requested count; only the newest slice is interviewed
    let service = Arc::new(ScriptedService::new(3).with_verdicts(&[false, true]));
    let workflow = Workflow::new(service.clone(), config(2));

    let state = workflow.run_to_state("r").await.unwrap();

    assert_eq!(state.personas.len(), 6);
    assert_eq!(
        state
            .interviews
            .iter()
            .map(|i| i.persona.name.as_str())
            .collect::<Vec<_>>(),
        names(["P2", "P3", "P5", "P6"])
    );
}

#[tokio::test]
async fn test_short_generations_are_not_reinterviewed() {
    // Five requested, two delivered per cycle: each cycle interviews only its own two
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[false, true]));
    let workflow = Workflow::new(service.clone(), WorkflowConfig::default());

    let state = workflow.run_to_state("build a fitness app").await.unwrap();

    assert_eq!(state.personas.len(), 4);
    assert_eq!(
        state
            .interviews
            .iter()
            .map(|i| i.persona.name.as_str())
            .collect::<Vec<_>>(),
        names(["P1", "P2", "P3", "P4"])
    );
    assert_eq!(service.calls(PromptKind::InterviewQuestion), 4);
    assert!(state.requirements_doc.contains("Interviews used: 4"));
}

#[tokio::test]
async fn test_zero_persona_count_still_interviews() {
    let service = Arc::new(ScriptedService::new(2).with_verdicts(&[true]));
    let workflow = Workflow::new(
        service.clone(),
        WorkflowConfig {
            persona_count: 0,
            max_iterations: 0,
            ..WorkflowConfig::default()
        },
    );
    assert_eq!(workflow.config().persona_count, 1);
    assert_eq!(workflow.config().max_iterations, 1);

    let state = workflow.run_to_state("r").await.unwrap();
    assert_eq!(state.iteration, 1);
    assert_eq!(state.interviews.len(), 1);
    assert_eq!(state.interviews[0].persona.name, "P2");
}

#[tokio::test]
async fn test_document_language_reaches_prompt() {
    let service = Arc::new(ScriptedService::new(1).with_verdicts(&[true]));
    let workflow = Workflow::new(
        service.clone(),
        WorkflowConfig {
            language: Some("Japanese".to_string()),
            ..WorkflowConfig::default()
        },
    );

    workflow.run("r").await.unwrap();
    let prompts = service.prompts(PromptKind::RequirementsDocument);
    assert!(prompts[0].user.contains("Write the entire document in Japanese."));
}

#[tokio::test]
async fn test_malformed_personas_fail_generate_stage() {
    let service = Arc::new(ScriptedService::new(2).fail_after(
        PromptKind::PersonaExtraction,
        0,
        ScriptFailure::Garbage,
    ));
    let workflow = Workflow::new(service.clone(), WorkflowConfig::default());

    let err = workflow.run("build a fitness app").await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::GeneratePersonas));
    assert_eq!(err.iteration(), 0);
    assert!(err.state().personas.is_empty());
    match &err {
        WorkflowError::StageFailed {
            cause: StageFailure::Generation(GenerationError::ExtractionFailure(e)),
            ..
        } => {
            assert_eq!(e.kind(), ExtractionErrorKind::Malformed);
            assert_eq!(e.raw(), "I'd rather not answer in JSON.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(service.calls(PromptKind::InterviewQuestion), 0);
}

#[tokio::test]
async fn test_answer_failure_keeps_earlier_progress() {
    // Second cycle's answers fail; first cycle's work survives in the error state
    let service = Arc::new(
        ScriptedService::new(2)
            .with_verdicts(&[false])
            .fail_after(PromptKind::InterviewAnswer, 2, ScriptFailure::Service),
    );
    let workflow = Workflow::new(service.clone(), config(2));

    let err = workflow.run_to_state("build a fitness app").await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::ConductInterviews));
    assert_eq!(err.iteration(), 2);
    assert_eq!(err.state().personas.len(), 4);
    assert_eq!(err.state().interviews.len(), 2);
    assert!(err.state().requirements_doc.is_empty());

    match &err {
        WorkflowError::StageFailed {
            cause: StageFailure::Simulation(SimulationError::BatchFailure { phase, source }),
            ..
        } => {
            assert_eq!(*phase, InterviewPhase::Answers);
            assert!(matches!(source, ServiceError::Request(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(service.calls(PromptKind::SufficiencyJudgment), 1);
    assert_eq!(service.calls(PromptKind::RequirementsDocument), 0);
}

#[tokio::test]
async fn test_unreadable_verdict_fails_evaluate_stage() {
    let service = Arc::new(ScriptedService::new(2).fail_after(
        PromptKind::SufficiencyExtraction,
        0,
        ScriptFailure::Garbage,
    ));
    let workflow = Workflow::new(service, WorkflowConfig::default());

    let err = workflow.run("r").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::EvaluateSufficiency));
    assert!(matches!(
        err,
        WorkflowError::StageFailed {
            cause: StageFailure::Evaluation(EvaluationError::ExtractionFailure(_)),
            ..
        }
    ));
}

#[tokio::test]
async fn test_document_service_failure_fails_document_stage() {
    let service = Arc::new(
        ScriptedService::new(2)
            .with_verdicts(&[true])
            .fail_after(PromptKind::RequirementsDocument, 0, ScriptFailure::Service),
    );
    let workflow = Workflow::new(service, WorkflowConfig::default());

    let err = workflow.run("r").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::GenerateDocument));
    assert_eq!(err.iteration(), 1);
    assert_eq!(err.state().interviews.len(), 2);
    assert!(err.to_string().contains("generate_document stage failed"));
}

#[tokio::test]
async fn test_blank_document_is_reported() {
    let service = Arc::new(
        ScriptedService::new(2)
            .with_verdicts(&[true])
            .with_document("   \n"),
    );
    let workflow = Workflow::new(service, WorkflowConfig::default());

    let err = workflow.run("r").await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::IterationCapReachedWithoutDocument { iteration: 1, .. }
    ));
    assert_eq!(err.stage(), None);
    assert_eq!(err.state().interviews.len(), 2);
}

#[tokio::test]
async fn test_workflow_is_reusable() {
    let service = Arc::new(ScriptedService::new(1).with_verdicts(&[true]));
    let workflow = Workflow::new(service, WorkflowConfig::default());

    let first = workflow.run_to_state("first").await.unwrap();
    let second = workflow.run_to_state("second").await.unwrap();

    assert_eq!(first.iteration, 1);
    assert_eq!(second.iteration, 1);
    assert_eq!(second.user_request, "second");
    assert_eq!(second.personas.len(), 1);
}
