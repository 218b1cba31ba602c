//! Generation backend port
//!
//! Defines the interface participants and arbiters use to obtain text from a
//! language model. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use debate_domain::GenerationError;
use std::time::Duration;

/// One text-generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
    /// Upper bound for the call, passed through unchanged from configuration
    pub deadline: Option<Duration>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            prompt: prompt.into(),
            deadline: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Backend producing text for a request
///
/// The debate core neither catches nor retries the returned errors; a
/// backend that wants retries implements them itself.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Short name for logs
    fn name(&self) -> &str;
}
