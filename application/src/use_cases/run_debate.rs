//! Run Debate use case.
//!
//! Builds the participants and arbiter a [`DebateConfig`] describes, runs
//! one debate through [`DebateManager`] and returns the summary with the
//! transcript.

use crate::agents::ParticipantFactory;
use crate::arbiters::build_arbiter;
use crate::config::DebateConfig;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::generation::GenerationBackend;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::use_cases::debate_manager::{DebateError, DebateManager};
use debate_domain::{DebateSummary, DomainError, Message, Topic};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while setting up or running a debate.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] DomainError),

    #[error(transparent)]
    Debate(#[from] DebateError),
}

/// Input for the [`RunDebateUseCase`].
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub topic: Topic,
    pub config: DebateConfig,
}

impl RunDebateInput {
    pub fn new(topic: Topic, config: DebateConfig) -> Self {
        Self { topic, config }
    }
}

/// Result of a finished debate
#[derive(Debug, Clone)]
pub struct RunDebateOutput {
    pub summary: DebateSummary,
    /// Messages of the trailing `context_window` rounds, or all of them
    pub transcript: Vec<Message>,
    pub dropped_deliveries: usize,
}

/// Use case for running one debate
pub struct RunDebateUseCase {
    backend: Arc<dyn GenerationBackend>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunDebateUseCase {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<RunDebateOutput, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<RunDebateOutput, RunDebateError> {
        let RunDebateInput { topic, config } = input;
        let prompts = Arc::new(config.prompts.clone());

        info!(
            "Setting up {} debate on {} via {}",
            config.mode,
            config.participant_model,
            self.backend.name()
        );

        let roster = ParticipantFactory::new(
            Arc::clone(&self.backend),
            Arc::clone(&prompts),
            &config.participant_model,
        )
        .with_deadline(config.timeout)
        .create_roster(
            topic.content(),
            config.mode,
            config.agents,
            &config.participants,
        )?;

        let arbiter = build_arbiter(
            config.arbiter,
            Arc::clone(&self.backend),
            prompts,
            &config.judge_model,
            config.timeout,
        );

        let mut manager = DebateManager::new(topic.content(), config.rounds, arbiter)?
            .with_conversation_logger(Arc::clone(&self.conversation_logger));
        for participant in roster {
            manager.register(participant)?;
        }

        let summary = manager.run_debate_with_progress(progress).await?;

        let transcript = match config.context_window {
            0 => manager.history().all_messages().to_vec(),
            window => manager
                .history()
                .context_window(summary.final_round.round_number, window),
        };

        Ok(RunDebateOutput {
            summary,
            transcript,
            dropped_deliveries: manager.dropped_deliveries(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation::GenerationRequest;
    use async_trait::async_trait;
    use debate_domain::{ArbiterKind, DebateMode, GenerationError, Topology};
    use std::sync::Mutex;
    use std::time::Duration;

    fn topic(text: &str) -> Topic {
        Topic::try_from(text).unwrap()
    }

    /// Answers with a fixed line and records models and deadlines
    #[derive(Default)]
    struct FixedBackend {
        calls: Mutex<Vec<(String, Option<Duration>)>>,
    }

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((request.model.clone(), request.deadline));
            Ok("Working...\nAnswer: 42".to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_dual_debate() {
        let backend = Arc::new(FixedBackend::default());
        let use_case = RunDebateUseCase::new(backend.clone());
        let config = DebateConfig::default()
            .with_mode(DebateMode::Dual)
            .with_rounds(2)
            .with_timeout_seconds(Some(9));

        let output = use_case
            .execute(RunDebateInput::new(topic("What is 6 x 7?"), config))
            .await
            .unwrap();

        assert_eq!(output.summary.topology, Topology::Pairwise);
        assert_eq!(output.summary.participants, vec!["solver", "critic"]);
        assert_eq!(output.transcript.len(), 4);
        assert_eq!(output.dropped_deliveries, 0);

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, deadline)| *deadline == Some(Duration::from_secs(9))));
    }

    #[tokio::test]
    async fn test_multi_debate_with_tally_and_judge_model() {
        let backend = Arc::new(FixedBackend::default());
        let use_case = RunDebateUseCase::new(backend.clone());

        let mut config = DebateConfig::default()
            .with_mode(DebateMode::Multi)
            .with_rounds(3)
            .with_arbiter(ArbiterKind::Tally);
        config.context_window = 1;

        let output = use_case
            .execute(RunDebateInput::new(topic("What is 6 x 7?"), config.clone()))
            .await
            .unwrap();

        assert_eq!(output.summary.topology, Topology::Group);
        assert!(
            output
                .summary
                .final_verdict
                .as_deref()
                .unwrap()
                .starts_with("Answer: 42\nVotes: 3/3")
        );
        // Window of 1 over round 3 covers rounds 2 and 3.
        assert_eq!(output.transcript.len(), 6);
        assert_eq!(backend.calls.lock().unwrap().len(), 9);

        let judge_backend = Arc::new(FixedBackend::default());
        config.arbiter = ArbiterKind::Deliberative;
        config.judge_model = "judge".to_string();
        RunDebateUseCase::new(judge_backend.clone())
            .execute(RunDebateInput::new(topic("What is 6 x 7?"), config))
            .await
            .unwrap();
        let calls = judge_backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls.last().unwrap().0, "judge");
    }

    #[tokio::test]
    async fn test_configuration_errors() {
        let use_case = RunDebateUseCase::new(Arc::new(FixedBackend::default()));

        let zero_rounds = DebateConfig::default().with_rounds(0);
        let result = use_case
            .execute(RunDebateInput::new(topic("topic"), zero_rounds))
            .await;
        assert!(matches!(
            result,
            Err(RunDebateError::Debate(DebateError::InvalidRoundBudget))
        ));

        let mut duplicate = DebateConfig::default().with_mode(DebateMode::Dual);
        duplicate.participants = vec![
            crate::config::ParticipantSpec::with_id("same"),
            crate::config::ParticipantSpec::with_id("same"),
        ];
        let result = use_case.execute(RunDebateInput::new(topic("topic"), duplicate)).await;
        assert!(matches!(
            result,
            Err(RunDebateError::Debate(DebateError::DuplicateParticipant(_)))
        ));
    }
}
