//! Participant roles and debate modes

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Behavioural variant of a participant
///
/// The variant decides what a follow-up turn consumes and how the final
/// answer is derived; generation itself is delegated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Self-dialogue: analyses, then revises its own previous answer
    Solo,
    /// Pairwise: proposes and defends a solution
    Solver,
    /// Pairwise: critiques the solver; stands behind the solver's latest answer
    Critic,
    /// Group: builds on the contributions of its peers
    Member,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Solo => "solo",
            ParticipantRole::Solver => "solver",
            ParticipantRole::Critic => "critic",
            ParticipantRole::Member => "member",
        }
    }

    /// Solver and critic exchange point-to-point with one counterpart
    pub fn is_pair(&self) -> bool {
        matches!(self, ParticipantRole::Solver | ParticipantRole::Critic)
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solo" | "single" => Ok(ParticipantRole::Solo),
            "solver" => Ok(ParticipantRole::Solver),
            "critic" => Ok(ParticipantRole::Critic),
            "member" | "multi" => Ok(ParticipantRole::Member),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// How many participants a debate is set up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateMode {
    /// One solo participant
    #[default]
    Single,
    /// A solver and a critic
    Dual,
    /// Three or more members and an arbiter
    Multi,
}

impl DebateMode {
    /// Smallest number of participants the mode accepts
    pub const MIN_MULTI_AGENTS: usize = 3;

    pub fn as_str(&self) -> &'static str {
        match self {
            DebateMode::Single => "single",
            DebateMode::Dual => "dual",
            DebateMode::Multi => "multi",
        }
    }

    /// Roles to instantiate, in speaking order
    pub fn roles(&self, agents: usize) -> Vec<ParticipantRole> {
        match self {
            DebateMode::Single => vec![ParticipantRole::Solo],
            DebateMode::Dual => vec![ParticipantRole::Solver, ParticipantRole::Critic],
            DebateMode::Multi => {
                vec![ParticipantRole::Member; agents.max(Self::MIN_MULTI_AGENTS)]
            }
        }
    }
}

impl std::fmt::Display for DebateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DebateMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "solo" | "self" => Ok(DebateMode::Single),
            "dual" | "pair" | "pairwise" => Ok(DebateMode::Dual),
            "multi" | "group" => Ok(DebateMode::Multi),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}
