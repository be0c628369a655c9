// Sufficiency evaluation - free-text judgment, then extract a verdict

use std::sync::Arc;

use super::error::EvaluationError;
use super::extract::extract_sufficiency;
use super::prompts;
use super::types::{EvaluationResult, Interview};
use crate::generation::GenerationService;

pub struct SufficiencyEvaluator {
    service: Arc<dyn GenerationService>,
}

impl SufficiencyEvaluator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Judge the full accumulated transcript.
    pub async fn evaluate(
        &self,
        user_request: &str,
        interviews: &[Interview],
    ) -> Result<EvaluationResult, EvaluationError> {
        let judgment = self
            .service
            .complete(&prompts::sufficiency_judgment(user_request, interviews))
            .await?;

        let payload = self
            .service
            .complete(&prompts::sufficiency_extraction(&judgment))
            .await?;

        let result = extract_sufficiency(&payload)?;

        tracing::debug!(
            interviews = interviews.len(),
            sufficient = result.sufficient,
            reason = %result.reason,
            "Sufficiency evaluated"
        );

        Ok(result)
    }
}
