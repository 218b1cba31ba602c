//! Application layer for agent-debate
//!
//! This crate contains the debate coordinator, use cases, port definitions,
//! and application configuration. It depends only on the domain layer.

pub mod agents;
pub mod arbiters;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{ParticipantFactory, PromptedComposer};
pub use arbiters::{DeliberativeArbiter, build_arbiter};
pub use config::{DebateConfig, ParticipantSpec};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation::{GenerationBackend, GenerationRequest},
    progress::{DebateProgressNotifier, NoProgress},
};
pub use use_cases::debate_manager::{DebateError, DebateManager};
pub use use_cases::run_debate::{
    RunDebateError, RunDebateInput, RunDebateOutput, RunDebateUseCase,
};
