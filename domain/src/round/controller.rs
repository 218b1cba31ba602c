//! Round lifecycle and per-round statistics

use crate::core::participant_id::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    InRound(u32),
    Finished,
}

/// Statistics recorded for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStatistics {
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub message_count: usize,
    pub participants: BTreeSet<ParticipantId>,
}

impl RoundStatistics {
    fn started_now() -> Self {
        Self {
            start_time: Utc::now(),
            end_time: None,
            message_count: 0,
            participants: BTreeSet::new(),
        }
    }

    /// Wall time of the round, once ended
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Point-in-time progress report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundProgress {
    pub current_round: u32,
    pub total_rounds: u32,
    pub remaining_rounds: u32,
    pub percent_complete: f64,
}

/// Finite-state round counter.
///
/// `current_round` is the last *started* round. Once the loop driving the
/// controller ends, that is also the last *completed* round: a refused
/// [`start_round`](Self::start_round) never applies its increment.
#[derive(Debug, Clone)]
pub struct RoundController {
    total_rounds: u32,
    current_round: u32,
    finished: bool,
    statistics: BTreeMap<u32, RoundStatistics>,
}

impl RoundController {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            current_round: 0,
            finished: false,
            statistics: BTreeMap::new(),
        }
    }

    /// Open the next round.
    ///
    /// Returns `false` without changing the counter when the next round would
    /// exceed the budget (always the case for a zero budget).
    pub fn start_round(&mut self) -> bool {
        if self.is_final_round() {
            self.finished = true;
            return false;
        }

        self.current_round += 1;
        self.statistics
            .insert(self.current_round, RoundStatistics::started_now());
        true
    }

    /// Stamp the end time of the current round. The first stamp wins.
    pub fn end_round(&mut self) {
        if let Some(stats) = self.statistics.get_mut(&self.current_round)
            && stats.end_time.is_none()
        {
            stats.end_time = Some(Utc::now());
        }
    }

    /// Attribute a message to the last-started round, ended or not
    pub fn record_message(&mut self, participant: &ParticipantId) {
        if let Some(stats) = self.statistics.get_mut(&self.current_round) {
            stats.message_count += 1;
            stats.participants.insert(participant.clone());
        }
    }

    /// No further round may start
    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    pub fn phase(&self) -> RoundPhase {
        if self.finished {
            RoundPhase::Finished
        } else if self.current_round == 0 {
            RoundPhase::NotStarted
        } else {
            RoundPhase::InRound(self.current_round)
        }
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Progress; a zero budget counts as complete
    pub fn progress(&self) -> RoundProgress {
        let percent_complete = if self.total_rounds == 0 {
            100.0
        } else {
            f64::from(self.current_round) / f64::from(self.total_rounds) * 100.0
        };

        RoundProgress {
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            remaining_rounds: self.total_rounds.saturating_sub(self.current_round),
            percent_complete,
        }
    }

    /// Statistics of `round`, or of the current round when `None`
    pub fn round_summary(&self, round: Option<u32>) -> Option<RoundStatistics> {
        let round = round.unwrap_or(self.current_round);
        self.statistics.get(&round).cloned()
    }

    pub fn statistics(&self) -> &BTreeMap<u32, RoundStatistics> {
        &self.statistics
    }
}
