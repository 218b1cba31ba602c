//! Turn composer backed by a generation backend

use crate::ports::generation::{GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use debate_domain::{DebatePrompts, GenerationError, TurnComposer, TurnRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Renders a turn with the debate's prompts and asks the backend for text.
pub struct PromptedComposer {
    backend: Arc<dyn GenerationBackend>,
    prompts: Arc<DebatePrompts>,
    model: String,
    persona: Option<String>,
    deadline: Option<Duration>,
}

impl PromptedComposer {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        prompts: Arc<DebatePrompts>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            prompts,
            model: model.into(),
            persona: None,
            deadline: None,
        }
    }

    pub fn with_persona(mut self, persona: Option<String>) -> Self {
        self.persona = persona;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl TurnComposer for PromptedComposer {
    async fn compose(&self, request: &TurnRequest) -> Result<String, GenerationError> {
        let rendered = self.prompts.render_turn(request, self.persona.as_deref());

        debug!(
            participant = %request.participant,
            round = request.round,
            turn = request.turn.as_str(),
            "Composing turn with {}",
            self.model
        );

        let generation = GenerationRequest::new(&self.model, rendered.user)
            .with_system_prompt(rendered.system)
            .with_deadline(self.deadline);

        let content = self.backend.generate(generation).await?;
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(self.model.clone()));
        }
        Ok(content)
    }
}
