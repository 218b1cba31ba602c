//! Debate participants
//!
//! Every participant satisfies the [`Participant`] contract. The shipped
//! implementation, [`DebateAgent`], composes an [`AgentCore`] with a
//! [`ParticipantRole`] and delegates content to a [`TurnComposer`].
//!
//! | Role     | Topology       | Follow-up consumes                  | Final answer                  |
//! |----------|----------------|-------------------------------------|-------------------------------|
//! | `Solo`   | self-dialogue  | its own previous message            | own latest message            |
//! | `Solver` | pairwise       | counterpart's latest message        | own latest message            |
//! | `Critic` | pairwise       | counterpart's latest message        | counterpart's latest message  |
//! | `Member` | group          | peer messages since its last turn   | own latest message            |

pub mod agent;
pub mod core;
pub mod role;
pub mod turn;

pub use agent::DebateAgent;
pub use core::AgentCore;
pub use role::{DebateMode, ParticipantRole};
pub use turn::{Turn, TurnComposer, TurnRequest};

use crate::core::error::GenerationError;
use crate::core::participant_id::{ParticipantId, Recipient};
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Final answer of a participant that has not spoken yet
pub const NO_ANSWER_YET: &str = "No answer generated yet";

/// Final answer of a critic that has not heard from its counterpart
pub const NO_COUNTERPART_ANSWER: &str = "No answer available";

/// Snapshot of a participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantState {
    pub id: String,
    pub role: ParticipantRole,
    pub total_messages: usize,
    pub final_answer: String,
}

/// Capability every debate participant provides to the coordinator
#[async_trait]
pub trait Participant: Send + Sync {
    fn id(&self) -> &ParticipantId;

    fn role(&self) -> ParticipantRole;

    /// Take note of a message addressed to this participant
    fn receive(&mut self, message: &Message);

    /// Produce exactly one message for `round`, addressed to `receiver`
    async fn respond(
        &mut self,
        round: u32,
        receiver: Recipient,
    ) -> Result<Message, GenerationError>;

    /// The answer this participant stands behind right now
    fn final_answer(&self) -> String;

    /// Number of messages in the participant's own history
    fn message_count(&self) -> usize;

    fn state(&self) -> ParticipantState {
        ParticipantState {
            id: self.id().to_string(),
            role: self.role(),
            total_messages: self.message_count(),
            final_answer: self.final_answer(),
        }
    }
}
