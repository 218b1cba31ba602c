//! State shared by every participant variant

use crate::core::participant_id::{ParticipantId, Recipient};
use crate::message::Message;

/// Identity, topic and personal history of a participant.
///
/// Composed into each variant so history tracking lives in one place.
#[derive(Debug, Clone)]
pub struct AgentCore {
    id: ParticipantId,
    topic: String,
    history: Vec<Message>,
}

impl AgentCore {
    pub fn new(id: ParticipantId, topic: impl Into<String>) -> Self {
        Self {
            id,
            topic: topic.into(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn history_for_round(&self, round: u32) -> Vec<&Message> {
        self.history
            .iter()
            .filter(|m| m.round_number() == round)
            .collect()
    }

    pub fn record(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Latest message this participant authored
    pub fn latest_own(&self) -> Option<&Message> {
        self.latest_from(&self.id)
    }

    pub fn latest_from(&self, sender: &ParticipantId) -> Option<&Message> {
        self.history.iter().rev().find(|m| m.is_from(sender))
    }

    pub fn create_message(
        &self,
        content: impl Into<String>,
        receiver: Recipient,
        round: u32,
    ) -> Message {
        Message::new(content, self.id.clone(), receiver, round)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
