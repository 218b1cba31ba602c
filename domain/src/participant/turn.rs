//! Turn requests handed to the content-generation collaborator

use crate::core::error::GenerationError;
use crate::core::participant_id::ParticipantId;
use crate::message::Message;
use crate::participant::role::ParticipantRole;
use async_trait::async_trait;

/// What a participant has to say something about this turn
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// First statement on the topic
    Opening,
    /// Self-dialogue follow-up: revisit the previous own answer
    Revision { previous: Message },
    /// Pairwise follow-up: answer the counterpart's latest message
    Rebuttal { counterpart: Message },
    /// Group follow-up: build on peers' contributions since the last own turn
    Collaboration { contributions: Vec<Message> },
}

impl Turn {
    pub fn is_opening(&self) -> bool {
        matches!(self, Turn::Opening)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Turn::Opening => "opening",
            Turn::Revision { .. } => "revision",
            Turn::Rebuttal { .. } => "rebuttal",
            Turn::Collaboration { .. } => "collaboration",
        }
    }
}

/// Everything a composer needs to produce one turn's content
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub participant: ParticipantId,
    pub role: ParticipantRole,
    pub topic: String,
    pub round: u32,
    pub turn: Turn,
}

/// Content-generation collaborator used by participants
///
/// Implementations live outside the domain (prompting a model, replaying a
/// script in tests, ...). Errors are returned untouched to the coordinator.
#[async_trait]
pub trait TurnComposer: Send + Sync {
    async fn compose(&self, request: &TurnRequest) -> Result<String, GenerationError>;
}
