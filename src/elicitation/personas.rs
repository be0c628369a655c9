// Persona generation - brainstorm in free text, then extract a typed list

use std::sync::Arc;

use super::error::GenerationError;
use super::extract::extract_personas;
use super::prompts;
use super::types::Persona;
use crate::generation::GenerationService;

pub struct PersonaGenerator {
    service: Arc<dyn GenerationService>,
}

impl PersonaGenerator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Generate roughly `count` personas relevant to `user_request`.
    ///
    /// The count is guidance for the generator, not enforced. Either phase
    /// failing is returned as-is; nothing is retried here.
    pub async fn generate(
        &self,
        user_request: &str,
        count: usize,
    ) -> Result<Vec<Persona>, GenerationError> {
        let brainstorm = self
            .service
            .complete(&prompts::persona_brainstorm(user_request, count))
            .await?;

        let payload = self
            .service
            .complete(&prompts::persona_extraction(&brainstorm))
            .await?;

        let personas = extract_personas(&payload)?;

        tracing::debug!(
            requested = count,
            generated = personas.len(),
            names = ?personas.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "Personas generated"
        );

        Ok(personas)
    }
}
