//! Final arbitration of group debates
//!
//! An [`Arbiter`] is consulted exactly once per group debate, over the
//! messages of the final completed round, and returns the verdict text.
//!
//! | Kind           | Aliases            | Implementation                    | Backend call |
//! |----------------|--------------------|-----------------------------------|--------------|
//! | `deliberative` | `llm`, `judge`     | judge model prompted with answers | yes          |
//! | `tally`        | `voting`, `vote`   | [`TallyArbiter`], plurality vote  | no           |
//!
//! `voting` counts the extracted answers locally. It does not ask a judge
//! model to vote; use `deliberative` for a model-made decision.

pub mod parsing;
pub mod tally;

pub use parsing::{extract_answer, normalize_answer};
pub use tally::{Ballot, TallyArbiter, TallyResult};

use crate::core::error::{DomainError, GenerationError};
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Arbitration policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArbiterKind {
    #[default]
    Deliberative,
    Tally,
}

impl ArbiterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArbiterKind::Deliberative => "deliberative",
            ArbiterKind::Tally => "tally",
        }
    }
}

impl std::fmt::Display for ArbiterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArbiterKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deliberative" | "llm" | "judge" => Ok(ArbiterKind::Deliberative),
            "tally" | "voting" | "vote" => Ok(ArbiterKind::Tally),
            other => Err(DomainError::UnknownArbiter(other.to_string())),
        }
    }
}

/// Renders the final decision of a group debate
#[async_trait]
pub trait Arbiter: Send + Sync {
    fn kind(&self) -> ArbiterKind;

    async fn decide(&self, messages: &[Message]) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aliases() {
        assert_eq!("llm".parse::<ArbiterKind>().unwrap(), ArbiterKind::Deliberative);
        assert_eq!("judge".parse::<ArbiterKind>().unwrap(), ArbiterKind::Deliberative);
        assert_eq!("Voting".parse::<ArbiterKind>().unwrap(), ArbiterKind::Tally);
        assert_eq!("vote".parse::<ArbiterKind>().unwrap(), ArbiterKind::Tally);
        assert_eq!(
            "coin".parse::<ArbiterKind>(),
            Err(DomainError::UnknownArbiter("coin".to_string()))
        );
    }
}
