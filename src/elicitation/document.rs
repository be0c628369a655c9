// Requirements document synthesis

use std::sync::Arc;

use super::error::GenerationError;
use super::prompts;
use super::types::Interview;
use crate::generation::GenerationService;

pub struct DocumentSynthesizer {
    service: Arc<dyn GenerationService>,
    language: Option<String>,
}

impl DocumentSynthesizer {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            language: None,
        }
    }

    /// Ask for the document in a specific natural language
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Single generation over all interviews; the raw text is the document.
    pub async fn synthesize(
        &self,
        user_request: &str,
        interviews: &[Interview],
    ) -> Result<String, GenerationError> {
        let prompt =
            prompts::requirements_document(user_request, interviews, self.language.as_deref());
        let document = self.service.complete(&prompt).await?;
        Ok(document.trim().to_string())
    }
}
