//! Debate coordinator
//!
//! [`DebateManager`] drives the round loop: each round it resolves the
//! topology from the number of registered participants, lets every
//! participant speak once in registration order, delivers each message
//! right after it is produced, then records the round into history and
//! round statistics.
//!
//! | Participants | Receiver of each message | Delivered to          |
//! |--------------|--------------------------|-----------------------|
//! | 1            | the speaker itself       | nobody                |
//! | 2            | the other participant    | the other participant |
//! | 3+           | broadcast (`all`)        | every other member    |
//!
//! Group debates end with one arbiter call over the final round's messages.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use debate_domain::{
    Arbiter, DebateState, DebateSummary, DomainError, FinalRound, GenerationError,
    HistoryManager, Message, Participant, ParticipantId, ParticipantState, Recipient,
    RoundController, Topic, Topology,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by the coordinator
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Round budget must be at least 1")]
    InvalidRoundBudget,

    #[error("Debate topic must not be empty")]
    InvalidTopic,

    #[error("No participants registered")]
    NoParticipants,

    #[error("Participant {0} is already registered")]
    DuplicateParticipant(ParticipantId),

    #[error("Debate has already been run")]
    AlreadyConcluded,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Coordinates one debate from registration to summary
pub struct DebateManager {
    topic: Topic,
    participants: Vec<Box<dyn Participant>>,
    rounds: RoundController,
    history: HistoryManager,
    arbiter: Arc<dyn Arbiter>,
    logger: Arc<dyn ConversationLogger>,
    verdict: Option<String>,
    dropped_deliveries: usize,
    concluded: bool,
}

impl DebateManager {
    pub fn new(
        topic: impl Into<String>,
        total_rounds: u32,
        arbiter: Arc<dyn Arbiter>,
    ) -> Result<Self, DebateError> {
        if total_rounds == 0 {
            return Err(DebateError::InvalidRoundBudget);
        }
        let topic = Topic::try_new(topic).ok_or(DebateError::InvalidTopic)?;

        Ok(Self {
            topic,
            participants: Vec::new(),
            rounds: RoundController::new(total_rounds),
            history: HistoryManager::new(),
            arbiter,
            logger: Arc::new(NoConversationLogger),
            verdict: None,
            dropped_deliveries: 0,
            concluded: false,
        })
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Add a participant at the end of the speaking order
    pub fn register(&mut self, participant: Box<dyn Participant>) -> Result<(), DebateError> {
        if self.concluded {
            return Err(DebateError::AlreadyConcluded);
        }
        if self.position(participant.id()).is_some() {
            return Err(DebateError::DuplicateParticipant(participant.id().clone()));
        }

        debug!(
            "Registered participant {} ({})",
            participant.id(),
            participant.role()
        );
        self.participants.push(participant);
        Ok(())
    }

    pub fn unregister(&mut self, id: &ParticipantId) -> Option<Box<dyn Participant>> {
        let index = self.position(id)?;
        Some(self.participants.remove(index))
    }

    /// Run the debate with default (no-op) progress
    pub async fn run_debate(&mut self) -> Result<DebateSummary, DebateError> {
        self.run_debate_with_progress(&NoProgress).await
    }

    /// Run every round, arbitrate if needed and return the summary.
    ///
    /// A manager runs at most one debate. Collaborator errors abort the run
    /// and are returned unchanged.
    pub async fn run_debate_with_progress(
        &mut self,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateSummary, DebateError> {
        if self.concluded {
            return Err(DebateError::AlreadyConcluded);
        }
        let topology = self.topology().ok_or(DebateError::NoParticipants)?;
        self.concluded = true;

        let total_rounds = self.rounds.total_rounds();
        info!(
            "Starting {} debate with {} participants over {} rounds",
            topology.display_name(),
            self.participants.len(),
            total_rounds
        );
        progress.on_debate_start(self.topic.content(), topology, total_rounds);
        self.logger.log(ConversationEvent::new(
            "debate_started",
            json!({
                "topic": self.topic.content(),
                "topology": topology,
                "total_rounds": total_rounds,
                "participants": self.participant_ids(),
            }),
        ));

        while self.rounds.start_round() {
            let round = self.rounds.current_round();
            progress.on_round_start(round, total_rounds);
            info!("Round {}/{}", round, total_rounds);

            let produced = self.play_round(round, progress).await?;
            let message_count = produced.len();

            for message in produced {
                self.rounds.record_message(message.sender());
                self.history.add_message(message);
            }
            self.rounds.end_round();

            self.logger.log(ConversationEvent::new(
                "round_completed",
                json!({
                    "round": round,
                    "message_count": message_count,
                    "statistics": self.rounds.round_summary(Some(round)),
                }),
            ));
            progress.on_round_complete(round, &self.debate_state());
        }

        let final_round = self.rounds.current_round();
        let final_messages = self.history.round_history(final_round);

        let topology = self.topology().ok_or(DebateError::NoParticipants)?;
        if topology.requires_arbitration() {
            progress.on_arbitration_start();
            info!(
                "Arbitrating ({}) over {} messages of round {}",
                self.arbiter.kind(),
                final_messages.len(),
                final_round
            );

            let verdict = self.arbiter.decide(&final_messages).await?;
            self.logger.log(ConversationEvent::new(
                "verdict",
                json!({
                    "arbiter": self.arbiter.kind(),
                    "round": final_round,
                    "verdict": verdict,
                }),
            ));
            self.verdict = Some(verdict);
        }

        let summary = self.summary(topology, final_round, final_messages);
        self.logger.log(ConversationEvent::new(
            "debate_completed",
            json!({
                "total_messages": summary.total_messages(),
                "final_answers": summary.final_answers,
                "dropped_deliveries": self.dropped_deliveries,
            }),
        ));
        progress.on_debate_complete(&summary);
        info!("Debate finished after {} rounds", final_round);

        Ok(summary)
    }

    /// Every participant speaks once, in registration order
    async fn play_round(
        &mut self,
        round: u32,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<Vec<Message>, DebateError> {
        let topology = self.topology().ok_or(DebateError::NoParticipants)?;
        let mut produced = Vec::with_capacity(self.participants.len());

        for index in 0..self.participants.len() {
            let receiver = match topology {
                Topology::SelfDialogue => {
                    Recipient::Participant(self.participants[index].id().clone())
                }
                Topology::Pairwise => {
                    Recipient::Participant(self.participants[(index + 1) % 2].id().clone())
                }
                Topology::Group => Recipient::Broadcast,
            };

            let message = self.participants[index].respond(round, receiver).await?;
            debug!(
                "{} -> {} (round {}, {} chars)",
                message.sender(),
                message.receiver(),
                round,
                message.content().len()
            );

            self.deliver(&message);
            self.logger.log(ConversationEvent::new(
                "message",
                json!({ "message": &message }),
            ));
            progress.on_message(&message);
            produced.push(message);
        }

        Ok(produced)
    }

    fn deliver(&mut self, message: &Message) {
        match message.receiver() {
            Recipient::Broadcast => {
                for participant in self
                    .participants
                    .iter_mut()
                    .filter(|p| !message.is_from(p.id()))
                {
                    participant.receive(message);
                }
            }
            Recipient::Participant(receiver) => {
                if message.is_from(receiver) {
                    return;
                }
                match self.participants.iter_mut().find(|p| p.id() == receiver) {
                    Some(participant) => participant.receive(message),
                    None => {
                        self.dropped_deliveries += 1;
                        warn!(
                            "Dropping message from {} to unregistered participant {}",
                            message.sender(),
                            receiver
                        );
                    }
                }
            }
        }
    }

    fn summary(
        &self,
        topology: Topology,
        final_round: u32,
        final_messages: Vec<Message>,
    ) -> DebateSummary {
        DebateSummary {
            topic: self.topic.content().to_string(),
            total_rounds: self.rounds.total_rounds(),
            topology,
            participants: self.participant_ids(),
            history_statistics: self.history.statistics(),
            round_statistics: self.rounds.statistics().clone(),
            final_verdict: self.verdict.clone(),
            final_answers: self
                .participants
                .iter()
                .map(|p| (p.id().to_string(), p.final_answer()))
                .collect::<BTreeMap<_, _>>(),
            participant_states: self.participant_states(),
            final_round: FinalRound {
                round_number: final_round,
                messages: final_messages,
            },
        }
    }

    fn position(&self, id: &ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id() == id)
    }

    /// Topology for the current registry; `None` when empty
    pub fn topology(&self) -> Option<Topology> {
        Topology::from_participant_count(self.participants.len())
    }

    /// Read-only snapshot of the debate
    pub fn debate_state(&self) -> DebateState {
        DebateState {
            topic: self.topic.content().to_string(),
            progress: self.rounds.progress(),
            statistics: self.history.statistics(),
        }
    }

    /// Participant snapshots in registration order
    pub fn participant_states(&self) -> Vec<ParticipantState> {
        self.participants.iter().map(|p| p.state()).collect()
    }

    pub fn participant_ids(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.id().to_string()).collect()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn rounds(&self) -> &RoundController {
        &self.rounds
    }

    pub fn verdict(&self) -> Option<&str> {
        self.verdict.as_deref()
    }

    /// Messages addressed to participants that were not registered
    pub fn dropped_deliveries(&self) -> usize {
        self.dropped_deliveries
    }

    pub fn is_concluded(&self) -> bool {
        self.concluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use debate_domain::{
        ArbiterKind, DebateAgent, NO_ANSWER_YET, ParticipantRole, RoundPhase, TallyArbiter,
        Turn, TurnComposer, TurnRequest,
    };
    use std::sync::Mutex;

    // ==================== Test doubles ====================

    /// Answers "<id>@<round>" and records every request
    #[derive(Default)]
    struct ScriptedComposer {
        requests: Mutex<Vec<TurnRequest>>,
        fail_on_round: Option<u32>,
    }

    #[async_trait]
    impl TurnComposer for ScriptedComposer {
        async fn compose(&self, request: &TurnRequest) -> Result<String, GenerationError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_on_round == Some(request.round) {
                return Err(GenerationError::RequestFailed("backend down".to_string()));
            }
            Ok(format!("{}@{}", request.participant, request.round))
        }
    }

    /// Records every decide call
    #[derive(Default)]
    struct RecordingArbiter {
        calls: Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl Arbiter for RecordingArbiter {
        fn kind(&self) -> ArbiterKind {
            ArbiterKind::Deliberative
        }

        async fn decide(&self, messages: &[Message]) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok("verdict".to_string())
        }
    }

    /// Participant that records the order of everything it sees
    struct Probe {
        id: ParticipantId,
        log: Arc<Mutex<Vec<String>>>,
        receiver_override: Option<Recipient>,
    }

    #[async_trait]
    impl Participant for Probe {
        fn id(&self) -> &ParticipantId {
            &self.id
        }

        fn role(&self) -> ParticipantRole {
            ParticipantRole::Member
        }

        fn receive(&mut self, message: &Message) {
            self.log.lock().unwrap().push(format!(
                "{} received {}",
                self.id,
                message.content()
            ));
        }

        async fn respond(
            &mut self,
            round: u32,
            receiver: Recipient,
        ) -> Result<Message, GenerationError> {
            let content = format!("{}@{}", self.id, round);
            self.log
                .lock()
                .unwrap()
                .push(format!("{} produced {}", self.id, content));
            let receiver = self.receiver_override.clone().unwrap_or(receiver);
            Ok(Message::new(content, self.id.clone(), receiver, round))
        }

        fn final_answer(&self) -> String {
            String::new()
        }

        fn message_count(&self) -> usize {
            0
        }
    }

    fn agent(
        id: &str,
        role: ParticipantRole,
        composer: &Arc<ScriptedComposer>,
    ) -> Box<dyn Participant> {
        Box::new(DebateAgent::new(
            ParticipantId::new(id),
            "topic",
            role,
            composer.clone(),
        ))
    }

    fn probe(id: &str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn Participant> {
        Box::new(Probe {
            id: ParticipantId::new(id),
            log: log.clone(),
            receiver_override: None,
        })
    }

    fn manager(rounds: u32) -> (DebateManager, Arc<RecordingArbiter>) {
        let arbiter = Arc::new(RecordingArbiter::default());
        let manager = DebateManager::new("What is 6 x 7?", rounds, arbiter.clone()).unwrap();
        (manager, arbiter)
    }

    // ==================== Construction & registry ====================

    #[test]
    fn test_rejects_invalid_construction() {
        let arbiter: Arc<dyn Arbiter> = Arc::new(TallyArbiter::new());
        assert!(matches!(
            DebateManager::new("topic", 0, arbiter.clone()),
            Err(DebateError::InvalidRoundBudget)
        ));
        assert!(matches!(
            DebateManager::new("   ", 2, arbiter),
            Err(DebateError::InvalidTopic)
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (mut manager, _) = manager(1);
        let composer = Arc::new(ScriptedComposer::default());

        manager.register(agent("a", ParticipantRole::Member, &composer)).unwrap();
        let result = manager.register(agent("a", ParticipantRole::Member, &composer));
        assert!(matches!(result, Err(DebateError::DuplicateParticipant(id)) if id.as_str() == "a"));
        assert_eq!(manager.participant_ids(), vec!["a"]);
    }

    #[test]
    fn test_unregister() {
        let (mut manager, _) = manager(1);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("a", ParticipantRole::Member, &composer)).unwrap();
        manager.register(agent("b", ParticipantRole::Member, &composer)).unwrap();

        let removed = manager.unregister(&ParticipantId::new("a")).unwrap();
        assert_eq!(removed.id().as_str(), "a");
        assert!(manager.unregister(&ParticipantId::new("a")).is_none());
        assert_eq!(manager.topology(), Some(Topology::SelfDialogue));
    }

    #[tokio::test]
    async fn test_empty_registry_rejected() {
        let (mut manager, _) = manager(2);
        assert!(matches!(
            manager.run_debate().await,
            Err(DebateError::NoParticipants)
        ));
        assert_eq!(manager.rounds().phase(), RoundPhase::NotStarted);
    }

    // ==================== Round lifecycle ====================

    #[tokio::test]
    async fn test_runs_exactly_the_round_budget() {
        let (mut manager, _) = manager(3);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("solo", ParticipantRole::Solo, &composer)).unwrap();

        let summary = manager.run_debate().await.unwrap();

        assert_eq!(summary.total_rounds, 3);
        assert_eq!(
            summary.round_statistics.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(summary.final_round.round_number, 3);
        assert_eq!(composer.requests.lock().unwrap().len(), 3);
        assert_eq!(manager.rounds().phase(), RoundPhase::Finished);

        let state = manager.debate_state();
        assert_eq!(state.progress.current_round, 3);
        assert_eq!(state.progress.remaining_rounds, 0);
        assert_eq!(state.statistics.total_messages, 3);
    }

    #[tokio::test]
    async fn test_second_run_rejected() {
        let (mut manager, _) = manager(1);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("solo", ParticipantRole::Solo, &composer)).unwrap();

        manager.run_debate().await.unwrap();
        assert!(matches!(
            manager.run_debate().await,
            Err(DebateError::AlreadyConcluded)
        ));
        assert!(matches!(
            manager.register(agent("late", ParticipantRole::Solo, &composer)),
            Err(DebateError::AlreadyConcluded)
        ));
    }

    // ==================== Topologies ====================

    #[tokio::test]
    async fn test_self_dialogue_revises_own_answer() {
        let (mut manager, arbiter) = manager(2);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("solo", ParticipantRole::Solo, &composer)).unwrap();

        let summary = manager.run_debate().await.unwrap();

        let messages = manager.history().all_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.is_self_addressed()));
        // Indexed once under the sender.
        assert_eq!(
            manager
                .history()
                .participant_history(&ParticipantId::new("solo"))
                .len(),
            2
        );

        let requests = composer.requests.lock().unwrap();
        assert!(requests[0].turn.is_opening());
        assert!(matches!(&requests[1].turn, Turn::Revision { previous } if previous.content() == "solo@1"));

        assert_eq!(summary.topology, Topology::SelfDialogue);
        assert_eq!(summary.final_answers["solo"], "solo@2");
        assert!(summary.final_verdict.is_none());
        assert!(arbiter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pairwise_alternates_and_rebuts_latest_message() {
        let (mut manager, arbiter) = manager(2);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("solver", ParticipantRole::Solver, &composer)).unwrap();
        manager.register(agent("critic", ParticipantRole::Critic, &composer)).unwrap();

        let summary = manager.run_debate().await.unwrap();

        let routing: Vec<(String, String)> = manager
            .history()
            .all_messages()
            .iter()
            .map(|m| (m.sender().to_string(), m.receiver().to_string()))
            .collect();
        assert_eq!(
            routing,
            vec![
                ("solver".to_string(), "critic".to_string()),
                ("critic".to_string(), "solver".to_string()),
                ("solver".to_string(), "critic".to_string()),
                ("critic".to_string(), "solver".to_string()),
            ]
        );

        let requests = composer.requests.lock().unwrap();
        assert!(requests[0].turn.is_opening());
        assert!(requests[1].turn.is_opening());
        // Round 2: solver answers the critic's round-1 message, critic the solver's round-2 one.
        assert!(matches!(&requests[2].turn, Turn::Rebuttal { counterpart } if counterpart.content() == "critic@1"));
        assert!(matches!(&requests[3].turn, Turn::Rebuttal { counterpart } if counterpart.content() == "solver@2"));

        assert_eq!(summary.final_answers["solver"], "solver@2");
        assert_eq!(summary.final_answers["critic"], "solver@2");
        assert!(summary.final_verdict.is_none());
        assert!(arbiter.calls.lock().unwrap().is_empty());

        // Point-to-point messages are indexed under both ends.
        assert_eq!(
            manager
                .history()
                .participant_history(&ParticipantId::new("critic"))
                .len(),
            4
        );
    }

    #[tokio::test]
    async fn test_group_delivers_before_next_speaker() {
        let (mut manager, _) = manager(1);
        let log = Arc::new(Mutex::new(Vec::new()));
        for id in ["a", "b", "c"] {
            manager.register(probe(id, &log)).unwrap();
        }

        manager.run_debate().await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                "a produced a@1",
                "b received a@1",
                "c received a@1",
                "b produced b@1",
                "a received b@1",
                "c received b@1",
                "c produced c@1",
                "a received c@1",
                "b received c@1",
            ]
        );
        assert!(!log.iter().any(|line| line == "a received a@1"));
    }

    #[tokio::test]
    async fn test_group_arbitrates_once_over_final_round() {
        let (mut manager, arbiter) = manager(2);
        let composer = Arc::new(ScriptedComposer::default());
        for id in ["a", "b", "c"] {
            manager.register(agent(id, ParticipantRole::Member, &composer)).unwrap();
        }

        let summary = manager.run_debate().await.unwrap();

        let calls = arbiter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let contents: Vec<&str> = calls[0].iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["a@2", "b@2", "c@2"]);

        assert_eq!(summary.final_verdict.as_deref(), Some("verdict"));
        assert_eq!(manager.verdict(), Some("verdict"));
        assert_eq!(summary.topology, Topology::Group);
        assert!(manager.history().all_messages().iter().all(|m| m.is_broadcast()));

        // Broadcasts are indexed only under the sender.
        assert_eq!(
            manager
                .history()
                .participant_history(&ParticipantId::new("b"))
                .len(),
            2
        );

        // Member b collaborated on c@1 and a@2 in round 2.
        let requests = composer.requests.lock().unwrap();
        let b_round_two = requests
            .iter()
            .find(|r| r.participant.as_str() == "b" && r.round == 2)
            .unwrap();
        match &b_round_two.turn {
            Turn::Collaboration { contributions } => {
                let seen: Vec<&str> = contributions.iter().map(|m| m.content()).collect();
                assert_eq!(seen, vec!["c@1", "a@2"]);
            }
            other => panic!("unexpected turn {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_round_history_partitions_all_messages() {
        let (mut manager, _) = manager(3);
        let composer = Arc::new(ScriptedComposer::default());
        for id in ["a", "b", "c", "d"] {
            manager.register(agent(id, ParticipantRole::Member, &composer)).unwrap();
        }

        let summary = manager.run_debate().await.unwrap();

        let history = manager.history();
        let per_round: usize = (1..=3).map(|r| history.round_history(r).len()).sum();
        assert_eq!(per_round, history.all_messages().len());
        assert_eq!(summary.history_statistics.total_messages, 12);
        for stats in summary.round_statistics.values() {
            assert_eq!(stats.message_count, 4);
            assert_eq!(stats.participants.len(), 4);
            assert!(stats.end_time.is_some());
        }
    }

    // ==================== Failures & routing ====================

    #[tokio::test]
    async fn test_generation_error_aborts_debate() {
        let arbiter = Arc::new(RecordingArbiter::default());
        let mut manager = DebateManager::new("topic", 3, arbiter.clone()).unwrap();
        let composer = Arc::new(ScriptedComposer {
            fail_on_round: Some(2),
            ..Default::default()
        });
        manager.register(agent("solo", ParticipantRole::Solo, &composer)).unwrap();

        let result = manager.run_debate().await;
        assert!(matches!(
            result,
            Err(DebateError::Generation(GenerationError::RequestFailed(_)))
        ));
        assert_eq!(manager.history().len(), 1);
        assert_eq!(manager.rounds().current_round(), 2);
        assert!(arbiter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_receiver_is_dropped() {
        let (mut manager, _) = manager(1);
        let log = Arc::new(Mutex::new(Vec::new()));
        manager
            .register(Box::new(Probe {
                id: ParticipantId::new("a"),
                log: log.clone(),
                receiver_override: Some(Recipient::Participant(ParticipantId::new("ghost"))),
            }))
            .unwrap();
        manager.register(probe("b", &log)).unwrap();

        let summary = manager.run_debate().await.unwrap();

        assert_eq!(manager.dropped_deliveries(), 1);
        assert_eq!(summary.history_statistics.total_messages, 2);
        assert!(!log.lock().unwrap().iter().any(|line| line == "b received a@1"));
    }

    #[tokio::test]
    async fn test_participant_states_in_registration_order() {
        let (mut manager, _) = manager(1);
        let composer = Arc::new(ScriptedComposer::default());
        manager.register(agent("solver", ParticipantRole::Solver, &composer)).unwrap();
        manager.register(agent("critic", ParticipantRole::Critic, &composer)).unwrap();

        let before = manager.participant_states();
        assert_eq!(before[0].final_answer, NO_ANSWER_YET);

        manager.run_debate().await.unwrap();

        let states = manager.participant_states();
        assert_eq!(states[0].id, "solver");
        assert_eq!(states[0].role, ParticipantRole::Solver);
        assert_eq!(states[0].total_messages, 2);
        assert_eq!(states[1].id, "critic");
        assert_eq!(states[1].final_answer, "solver@1");
    }

    #[tokio::test]
    async fn test_conversation_events_are_logged() {
        #[derive(Default)]
        struct Capture(Mutex<Vec<String>>);

        impl ConversationLogger for Capture {
            fn log(&self, event: ConversationEvent) {
                self.0.lock().unwrap().push(event.event_type.to_string());
            }
        }

        let capture = Arc::new(Capture::default());
        let (manager, _) = manager(1);
        let mut manager = manager.with_conversation_logger(capture.clone());
        let composer = Arc::new(ScriptedComposer::default());
        for id in ["a", "b", "c"] {
            manager.register(agent(id, ParticipantRole::Member, &composer)).unwrap();
        }

        manager.run_debate().await.unwrap();

        let events = capture.0.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "debate_started",
                "message",
                "message",
                "message",
                "round_completed",
                "verdict",
                "debate_completed",
            ]
        );
    }

    // ==================== Progress ====================

    /// Records the snapshot handed over after each round
    #[derive(Default)]
    struct SnapshotRecorder {
        snapshots: Mutex<Vec<(u32, u32, usize)>>,
    }

    impl DebateProgressNotifier for SnapshotRecorder {
        fn on_debate_start(&self, _topic: &str, _topology: Topology, _total_rounds: u32) {}
        fn on_round_start(&self, _round: u32, _total_rounds: u32) {}

        fn on_round_complete(&self, round: u32, state: &DebateState) {
            self.snapshots.lock().unwrap().push((
                round,
                state.progress.current_round,
                state.statistics.total_messages,
            ));
        }
    }

    #[tokio::test]
    async fn test_state_is_reported_after_each_round() {
        let (mut manager, _) = manager(2);
        let composer = Arc::new(ScriptedComposer::default());
        for id in ["a", "b", "c"] {
            manager.register(agent(id, ParticipantRole::Member, &composer)).unwrap();
        }

        let recorder = SnapshotRecorder::default();
        manager.run_debate_with_progress(&recorder).await.unwrap();

        assert_eq!(
            *recorder.snapshots.lock().unwrap(),
            vec![(1, 1, 3), (2, 2, 6)]
        );
    }
}
