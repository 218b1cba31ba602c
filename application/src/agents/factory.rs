//! Builds the participant roster for a debate mode

use crate::agents::composer::PromptedComposer;
use crate::config::ParticipantSpec;
use crate::ports::generation::GenerationBackend;
use debate_domain::{
    DebateAgent, DebateMode, DebatePrompts, DomainError, Participant, ParticipantId,
    ParticipantRole,
};
use std::sync::Arc;
use std::time::Duration;

/// Creates [`DebateAgent`]s that generate through one backend.
pub struct ParticipantFactory {
    backend: Arc<dyn GenerationBackend>,
    prompts: Arc<DebatePrompts>,
    model: String,
    deadline: Option<Duration>,
}

impl ParticipantFactory {
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

    /// Create one participant
    pub fn create(
        &self,
        id: ParticipantId,
        role: ParticipantRole,
        topic: &str,
        persona: Option<String>,
    ) -> DebateAgent {
        let composer = PromptedComposer::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.prompts),
            &self.model,
        )
        .with_persona(persona)
        .with_deadline(self.deadline);

        DebateAgent::new(id, topic, role, Arc::new(composer))
    }

    /// Create the participants of `mode`, in speaking order.
    ///
    /// `specs[i]` customises the i-th slot (id, role, persona). In multi mode
    /// the roster grows to cover every spec; other modes reject extra specs.
    pub fn create_roster(
        &self,
        topic: &str,
        mode: DebateMode,
        agents: usize,
        specs: &[ParticipantSpec],
    ) -> Result<Vec<Box<dyn Participant>>, DomainError> {
        let slots = match mode {
            DebateMode::Multi => mode.roles(agents.max(specs.len())),
            _ => mode.roles(agents),
        };
        if specs.len() > slots.len() {
            return Err(DomainError::IndexOutOfRange {
                index: slots.len(),
                len: slots.len(),
            });
        }

        let mut members: Vec<(ParticipantId, ParticipantRole, Option<String>)> =
            Vec::with_capacity(slots.len());
        for (index, default_role) in slots.iter().enumerate() {
            let spec = specs.get(index);

            let role = spec.and_then(|s| s.role).unwrap_or(*default_role);
            if !slots.contains(&role) {
                return Err(DomainError::UnknownRole(format!(
                    "{} is not available in {} mode",
                    role, mode
                )));
            }

            let id = match spec.and_then(|s| s.id.as_deref()) {
                Some(id) => ParticipantId::try_new(id)?,
                None => default_id(role, index),
            };

            members.push((id, role, spec.and_then(|s| s.persona.clone())));
        }

        let pair_ids: Vec<ParticipantId> = members
            .iter()
            .filter(|(_, role, _)| role.is_pair())
            .map(|(id, _, _)| id.clone())
            .collect();

        let roster = members
            .into_iter()
            .map(|(id, role, persona)| {
                let mut agent = self.create(id.clone(), role, topic, persona);
                if role.is_pair()
                    && let Some(counterpart) = pair_ids.iter().find(|other| **other != id)
                {
                    agent = agent.with_counterpart(counterpart.clone());
                }
                Box::new(agent) as Box<dyn Participant>
            })
            .collect();

        Ok(roster)
    }
}

fn default_id(role: ParticipantRole, index: usize) -> ParticipantId {
    match role {
        ParticipantRole::Member => ParticipantId::new(format!("agent_{}", index + 1)),
        other => ParticipantId::new(other.as_str()),
    }
}
