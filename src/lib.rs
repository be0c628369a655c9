// Elicit - requirements elicitation through simulated user interviews
// Library exports

pub mod config;
pub mod elicitation;
pub mod generation;
pub mod providers;

pub use elicitation::{Workflow, WorkflowConfig, WorkflowError};
pub use generation::{GenerationService, Prompt, PromptKind, ServiceError};
