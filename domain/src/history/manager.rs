//! Conversation history with round and participant indices

use crate::core::participant_id::ParticipantId;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated history statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStatistics {
    pub total_messages: usize,
    /// Messages of each round, in insertion order
    pub messages_per_round: BTreeMap<u32, Vec<Message>>,
    /// Number of indexed entries per participant (sent + directly received)
    pub messages_per_participant: BTreeMap<String, usize>,
}

/// Append-only message store with three views over one sequence.
///
/// The round and participant indices hold positions into `messages`, so every
/// view is consistent with the chronological list by construction.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    messages: Vec<Message>,
    by_round: BTreeMap<u32, Vec<usize>>,
    by_participant: BTreeMap<ParticipantId, Vec<usize>>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to all indices. Never rejects.
    ///
    /// Point-to-point messages are indexed under both sender and receiver;
    /// broadcast and self-addressed messages only under the sender.
    pub fn add_message(&mut self, message: Message) {
        let position = self.messages.len();

        self.by_round
            .entry(message.round_number())
            .or_default()
            .push(position);

        self.by_participant
            .entry(message.sender().clone())
            .or_default()
            .push(position);

        if let Some(receiver) = message.receiver().participant()
            && receiver != message.sender()
        {
            self.by_participant
                .entry(receiver.clone())
                .or_default()
                .push(position);
        }

        self.messages.push(message);
    }

    /// Messages of a round in insertion order; empty for unknown rounds
    pub fn round_history(&self, round: u32) -> Vec<Message> {
        self.collect(self.by_round.get(&round))
    }

    /// Messages involving a participant; empty for unknown ids
    pub fn participant_history(&self, id: &ParticipantId) -> Vec<Message> {
        self.collect(self.by_participant.get(id))
    }

    /// Messages of rounds `max(1, round - window_size)..=round`, ascending
    pub fn context_window(&self, round: u32, window_size: u32) -> Vec<Message> {
        if round == 0 {
            return Vec::new();
        }
        let start = round.saturating_sub(window_size).max(1);
        self.by_round
            .range(start..=round)
            .flat_map(|(_, positions)| positions.iter().map(|&p| self.messages[p].clone()))
            .collect()
    }

    /// Messages of a round grouped by sender
    pub fn round_summary(&self, round: u32) -> BTreeMap<ParticipantId, Vec<Message>> {
        let mut summary: BTreeMap<ParticipantId, Vec<Message>> = BTreeMap::new();
        for message in self.round_history(round) {
            summary
                .entry(message.sender().clone())
                .or_default()
                .push(message);
        }
        summary
    }

    /// The chronological sequence
    pub fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    /// Round numbers that have at least one message
    pub fn rounds(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_round.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn statistics(&self) -> HistoryStatistics {
        HistoryStatistics {
            total_messages: self.messages.len(),
            messages_per_round: self
                .by_round
                .keys()
                .map(|&round| (round, self.round_history(round)))
                .collect(),
            messages_per_participant: self
                .by_participant
                .iter()
                .map(|(id, positions)| (id.to_string(), positions.len()))
                .collect(),
        }
    }

    /// Reset all three indices together
    pub fn clear(&mut self) {
        self.messages.clear();
        self.by_round.clear();
        self.by_participant.clear();
    }

    fn collect(&self, positions: Option<&Vec<usize>>) -> Vec<Message> {
        positions
            .map(|ps| ps.iter().map(|&p| self.messages[p].clone()).collect())
            .unwrap_or_default()
    }
}
