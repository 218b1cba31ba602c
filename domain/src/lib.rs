//! Domain layer for agent-debate
//!
//! This crate contains the debate engine's entities, value objects and
//! participant contracts. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! A debate runs for a fixed budget of rounds. [`RoundController`] opens and
//! closes rounds and never lets the counter pass the budget.
//!
//! ## Topology
//!
//! The number of registered participants decides how a round is routed:
//!
//! - **Self-dialogue** (1): the participant addresses itself and revises
//! - **Pairwise** (2): solver and critic alternate point-to-point
//! - **Group** (3+): members broadcast, an [`Arbiter`] decides at the end
//!
//! ## History
//!
//! [`HistoryManager`] indexes every recorded [`Message`] by round and by
//! participant.

pub mod arbiter;
pub mod config;
pub mod core;
pub mod history;
pub mod message;
pub mod participant;
pub mod prompt;
pub mod round;
pub mod summary;
pub mod topology;

// Re-export commonly used types
pub use arbiter::{
    Arbiter, ArbiterKind, TallyArbiter, TallyResult, extract_answer, normalize_answer,
};
pub use config::OutputFormat;
pub use core::{
    error::{DomainError, GenerationError},
    participant_id::{BROADCAST, ParticipantId, Recipient},
    topic::Topic,
};
pub use history::{HistoryManager, HistoryStatistics};
pub use message::{Message, MessageKind};
pub use participant::{
    AgentCore, DebateAgent, DebateMode, NO_ANSWER_YET, NO_COUNTERPART_ANSWER, Participant,
    ParticipantRole, ParticipantState, Turn, TurnComposer, TurnRequest,
};
pub use prompt::{DebatePrompts, JudgePrompts, PromptSet, RenderedPrompt};
pub use round::{RoundController, RoundPhase, RoundProgress, RoundStatistics};
pub use summary::{DebateState, DebateSummary, FinalRound};
pub use topology::Topology;
