// Interview simulation - one question and one answer per persona
//
// Both phases are batches of independent prompts. Results come back in
// persona order; any failed item fails the whole batch.

use std::sync::Arc;
use std::time::Duration;

use super::error::{InterviewPhase, SimulationError};
use super::prompts;
use super::types::{Interview, Persona};
use crate::generation::{GenerationService, Prompt, ServiceError};

pub struct InterviewSimulator {
    service: Arc<dyn GenerationService>,
    batch_timeout: Option<Duration>,
}

impl InterviewSimulator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            batch_timeout: None,
        }
    }

    /// Bound each joint batch await
    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Interview every persona once. Output is aligned with `personas`.
    pub async fn run(
        &self,
        user_request: &str,
        personas: &[Persona],
    ) -> Result<Vec<Interview>, SimulationError> {
        if personas.is_empty() {
            return Ok(Vec::new());
        }

        let question_prompts: Vec<Prompt> = personas
            .iter()
            .map(|p| prompts::interview_question(user_request, p))
            .collect();
        let questions = self
            .dispatch(InterviewPhase::Questions, &question_prompts)
            .await?;

        let answer_prompts: Vec<Prompt> = personas
            .iter()
            .zip(&questions)
            .map(|(p, q)| prompts::interview_answer(p, q))
            .collect();
        let answers = self
            .dispatch(InterviewPhase::Answers, &answer_prompts)
            .await?;

        let interviews = personas
            .iter()
            .zip(questions)
            .zip(answers)
            .map(|((persona, question), answer)| Interview {
                persona: persona.clone(),
                question: question.trim().to_string(),
                answer: answer.trim().to_string(),
            })
            .collect();

        Ok(interviews)
    }

    async fn dispatch(
        &self,
        phase: InterviewPhase,
        batch: &[Prompt],
    ) -> Result<Vec<String>, SimulationError> {
        tracing::debug!(%phase, size = batch.len(), "Dispatching interview batch");

        let joined = self.service.complete_batch(batch);
        let result = match self.batch_timeout {
            Some(limit) => match tokio::time::timeout(limit, joined).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::Timeout(limit)),
            },
            None => joined.await,
        };

        let replies = result.map_err(|source| SimulationError::BatchFailure { phase, source })?;

        if replies.len() != batch.len() {
            return Err(SimulationError::BatchFailure {
                phase,
                source: ServiceError::BatchLength {
                    expected: batch.len(),
                    got: replies.len(),
                },
            });
        }

        Ok(replies)
    }
}
