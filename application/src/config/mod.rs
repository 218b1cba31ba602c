//! Application-level configuration.
//!
//! [`DebateConfig`] is the validated configuration a debate runs with. The
//! infrastructure layer builds it from files, environment and CLI flags.

use debate_domain::{ArbiterKind, DebateMode, DebatePrompts, ParticipantRole};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of rounds
pub const DEFAULT_ROUNDS: u32 = 2;

/// Default model for participants and judge
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// One explicitly configured participant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub id: Option<String>,
    pub role: Option<ParticipantRole>,
    /// Background text prepended to the participant's system prompt
    pub persona: Option<String>,
}

impl ParticipantSpec {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn role(mut self, role: ParticipantRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Everything needed to set up and run one debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    pub rounds: u32,
    pub mode: DebateMode,
    /// Member count for multi mode
    pub agents: usize,
    pub arbiter: ArbiterKind,
    /// Trailing rounds kept in the returned transcript (0 keeps all)
    pub context_window: u32,
    pub participant_model: String,
    pub judge_model: String,
    pub participants: Vec<ParticipantSpec>,
    #[serde(skip)]
    pub prompts: DebatePrompts,
    /// Deadline passed with every generation request
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            mode: DebateMode::default(),
            agents: DebateMode::MIN_MULTI_AGENTS,
            arbiter: ArbiterKind::default(),
            context_window: 0,
            participant_model: DEFAULT_MODEL.to_string(),
            judge_model: DEFAULT_MODEL.to_string(),
            participants: Vec::new(),
            prompts: DebatePrompts::default(),
            timeout: None,
        }
    }
}

impl DebateConfig {
    pub fn with_mode(mut self, mode: DebateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_arbiter(mut self, arbiter: ArbiterKind) -> Self {
        self.arbiter = arbiter;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }
}
