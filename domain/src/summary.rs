//! Debate summaries and state snapshots

use crate::history::HistoryStatistics;
use crate::message::Message;
use crate::participant::ParticipantState;
use crate::round::{RoundProgress, RoundStatistics};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages of the last completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRound {
    pub round_number: u32,
    pub messages: Vec<Message>,
}

/// Result of a finished debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateSummary {
    pub topic: String,
    pub total_rounds: u32,
    pub topology: Topology,
    /// Registration order
    pub participants: Vec<String>,
    pub history_statistics: HistoryStatistics,
    pub round_statistics: BTreeMap<u32, RoundStatistics>,
    /// Present for group debates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_verdict: Option<String>,
    pub final_answers: BTreeMap<String, String>,
    /// Participant snapshots in registration order
    pub participant_states: Vec<ParticipantState>,
    pub final_round: FinalRound,
}

impl DebateSummary {
    /// The verdict for group debates, otherwise the answer of the first
    /// registered participant
    pub fn headline_answer(&self) -> Option<&str> {
        self.final_verdict.as_deref().or_else(|| {
            self.participants
                .first()
                .and_then(|id| self.final_answers.get(id))
                .map(String::as_str)
        })
    }

    /// Messages produced during the debate
    pub fn total_messages(&self) -> usize {
        self.history_statistics.total_messages
    }
}

/// Read-only view of a debate in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateState {
    pub topic: String,
    pub progress: RoundProgress,
    pub statistics: HistoryStatistics,
}
