//! Plurality vote over the answers of the final round

use super::parsing::{extract_answer, latest_by_sender, normalize_answer};
use super::{Arbiter, ArbiterKind};
use crate::core::error::GenerationError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The answer one participant committed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub participant: String,
    pub answer: String,
}

/// Outcome of a tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyResult {
    /// Winning answer, as first written by one of its supporters
    pub winner: String,
    pub votes: usize,
    pub total_votes: usize,
    /// Participants whose answer matched the winner, in ballot order
    pub supporters: Vec<String>,
    pub ballots: Vec<Ballot>,
}

impl TallyResult {
    /// Count one ballot per sender (their latest message).
    ///
    /// Ties go to the answer that appeared first. `None` when no message
    /// carries an answer.
    pub fn from_messages(messages: &[Message]) -> Option<Self> {
        let ballots: Vec<Ballot> = latest_by_sender(messages)
            .into_iter()
            .filter_map(|m| {
                extract_answer(m.content()).map(|answer| Ballot {
                    participant: m.sender().to_string(),
                    answer,
                })
            })
            .collect();

        // (normalized key, first spelling, supporters)
        let mut counts: Vec<(String, String, Vec<String>)> = Vec::new();
        for ballot in &ballots {
            let key = normalize_answer(&ballot.answer);
            match counts.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, _, supporters)) => supporters.push(ballot.participant.clone()),
                None => counts.push((key, ballot.answer.clone(), vec![ballot.participant.clone()])),
            }
        }

        let mut winner: Option<&(String, String, Vec<String>)> = None;
        for entry in &counts {
            if winner.is_none_or(|w| entry.2.len() > w.2.len()) {
                winner = Some(entry);
            }
        }
        let (_, answer, supporters) = winner?;

        Some(Self {
            winner: answer.clone(),
            votes: supporters.len(),
            total_votes: ballots.len(),
            supporters: supporters.clone(),
            ballots,
        })
    }

    pub fn is_unanimous(&self) -> bool {
        self.votes == self.total_votes
    }

    /// Share of ballots backing the winner (0.0 to 1.0)
    pub fn support_ratio(&self) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            self.votes as f64 / self.total_votes as f64
        }
    }

    /// Verdict text handed back to the coordinator
    pub fn verdict(&self) -> String {
        let mut text = format!(
            "Answer: {}\nVotes: {}/{} ({})",
            self.winner,
            self.votes,
            self.total_votes,
            self.supporters.join(", ")
        );
        for ballot in &self.ballots {
            text.push_str(&format!("\n- {}: {}", ballot.participant, ballot.answer));
        }
        text
    }
}

/// Deterministic arbiter that never calls a backend
#[derive(Debug, Clone, Copy, Default)]
pub struct TallyArbiter;

impl TallyArbiter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Arbiter for TallyArbiter {
    fn kind(&self) -> ArbiterKind {
        ArbiterKind::Tally
    }

    async fn decide(&self, messages: &[Message]) -> Result<String, GenerationError> {
        TallyResult::from_messages(messages)
            .map(|result| result.verdict())
            .ok_or_else(|| GenerationError::Other("No answers to tally".to_string()))
    }
}
