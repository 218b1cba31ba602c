//! Arbiter that asks a judge model for the final decision

use crate::ports::generation::{GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use debate_domain::{Arbiter, ArbiterKind, DebatePrompts, GenerationError, Message};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DeliberativeArbiter {
    backend: Arc<dyn GenerationBackend>,
    prompts: Arc<DebatePrompts>,
    model: String,
    deadline: Option<Duration>,
}

impl DeliberativeArbiter {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        prompts: Arc<DebatePrompts>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            prompts,
            model: model.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl Arbiter for DeliberativeArbiter {
    fn kind(&self) -> ArbiterKind {
        ArbiterKind::Deliberative
    }

    async fn decide(&self, messages: &[Message]) -> Result<String, GenerationError> {
        info!("Judge {} deciding over {} messages", self.model, messages.len());

        let rendered = self.prompts.render_judgment(messages);
        let request = GenerationRequest::new(&self.model, rendered.user)
            .with_system_prompt(rendered.system)
            .with_deadline(self.deadline);

        self.backend.generate(request).await
    }
}
