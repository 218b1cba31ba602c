//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like values stay strings here so aliases (`llm`, `pairwise`, ...)
//! are accepted; [`FileConfig::to_debate_config`] validates them.

use debate_application::{DebateConfig, ParticipantSpec};
use debate_domain::{
    ArbiterKind, DebateMode, DebatePrompts, DomainError, OutputFormat, ParticipantRole,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("debate.rounds cannot be 0")]
    ZeroRounds,

    #[error("provider.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("API key not found: set ${0} or provider.api_key")]
    MissingApiKey(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// `[debate]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub rounds: u32,
    /// single / dual / multi
    pub mode: String,
    /// Member count in multi mode
    pub agents: usize,
    /// deliberative / tally (aliases: llm / voting)
    pub arbiter: String,
    pub context_window: u32,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            rounds: 2,
            mode: "single".to_string(),
            agents: DebateMode::MIN_MULTI_AGENTS,
            arbiter: "deliberative".to_string(),
            context_window: 0,
        }
    }
}

/// `[models]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub participant: String,
    /// Falls back to the participant model
    pub judge: Option<String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            participant: debate_application::config::DEFAULT_MODEL.to_string(),
            judge: None,
        }
    }
}

/// Which generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions endpoint
    #[default]
    OpenAi,
    /// Offline deterministic backend
    Echo,
}

/// `[provider]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: Some(120),
            max_retries: 5,
            retry_backoff_ms: 2000,
        }
    }
}

impl FileProviderConfig {
    /// The configured key, or the one found in `api_key_env`
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.api_key_env.clone()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// One `[[participants]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    pub id: Option<String>,
    pub role: Option<String>,
    pub persona: Option<String>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
    /// Where JSON reports are written; no reports when unset
    pub report_dir: Option<PathBuf>,
    /// Where JSONL transcripts are written; no transcripts when unset
    pub transcript_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub debate: FileDebateConfig,
    pub models: FileModelsConfig,
    pub provider: FileProviderConfig,
    pub participants: Vec<FileParticipantConfig>,
    /// Flat template overrides (`solver_follow_up = "..."`)
    pub prompts: BTreeMap<String, String>,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Check values that cannot be expressed in the TOML types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debate.rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.provider.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        let judge_empty = self
            .models
            .judge
            .as_ref()
            .is_some_and(|j| j.trim().is_empty());
        if self.models.participant.trim().is_empty() || judge_empty {
            return Err(ConfigError::EmptyModelName);
        }
        Ok(())
    }

    /// Convert into the application's validated configuration
    pub fn to_debate_config(&self) -> Result<DebateConfig, ConfigError> {
        self.validate()?;

        let mode: DebateMode = self.debate.mode.parse()?;
        let arbiter: ArbiterKind = self.debate.arbiter.parse()?;

        let participants = self
            .participants
            .iter()
            .map(|p| {
                Ok(ParticipantSpec {
                    id: p.id.clone(),
                    role: p
                        .role
                        .as_deref()
                        .map(str::parse::<ParticipantRole>)
                        .transpose()?,
                    persona: p.persona.clone(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let mut prompts = DebatePrompts::default();
        for (key, value) in &self.prompts {
            prompts.apply_override(key, value.as_str())?;
        }

        let participant_model = self.models.participant.trim().to_string();
        let judge_model = self
            .models
            .judge
            .as_deref()
            .map(str::trim)
            .unwrap_or(participant_model.as_str())
            .to_string();

        Ok(DebateConfig {
            rounds: self.debate.rounds,
            mode,
            agents: self.debate.agents,
            arbiter,
            context_window: self.debate.context_window,
            participant_model,
            judge_model,
            participants,
            prompts,
            timeout: self.provider.timeout(),
        })
    }
}
