//! The participant implementation shared by all roles

use crate::core::error::GenerationError;
use crate::core::participant_id::{ParticipantId, Recipient};
use crate::message::Message;
use crate::participant::core::AgentCore;
use crate::participant::role::ParticipantRole;
use crate::participant::turn::{Turn, TurnComposer, TurnRequest};
use crate::participant::{NO_ANSWER_YET, NO_COUNTERPART_ANSWER, Participant};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Role-specific bookkeeping updated on every `receive`
#[derive(Debug, Clone)]
enum Tracking {
    Solo,
    Pair {
        counterpart: Option<ParticipantId>,
        last_counterpart_message: Option<Message>,
    },
    Member {
        peers: BTreeSet<ParticipantId>,
        contributions: Vec<Message>,
    },
}

impl Tracking {
    fn for_role(role: ParticipantRole) -> Self {
        match role {
            ParticipantRole::Solo => Tracking::Solo,
            ParticipantRole::Solver | ParticipantRole::Critic => Tracking::Pair {
                counterpart: None,
                last_counterpart_message: None,
            },
            ParticipantRole::Member => Tracking::Member {
                peers: BTreeSet::new(),
                contributions: Vec::new(),
            },
        }
    }
}

/// A debate participant: shared [`AgentCore`] plus role tracking, with
/// content produced by a [`TurnComposer`].
pub struct DebateAgent {
    core: AgentCore,
    role: ParticipantRole,
    tracking: Tracking,
    composer: Arc<dyn TurnComposer>,
}

impl DebateAgent {
    pub fn new(
        id: ParticipantId,
        topic: impl Into<String>,
        role: ParticipantRole,
        composer: Arc<dyn TurnComposer>,
    ) -> Self {
        Self {
            core: AgentCore::new(id, topic),
            role,
            tracking: Tracking::for_role(role),
            composer,
        }
    }

    /// Fix the counterpart of a pair role up front.
    ///
    /// Without it, the first participant heard from becomes the counterpart.
    pub fn with_counterpart(mut self, counterpart: ParticipantId) -> Self {
        if let Tracking::Pair {
            counterpart: slot, ..
        } = &mut self.tracking
        {
            *slot = Some(counterpart);
        }
        self
    }

    pub fn core(&self) -> &AgentCore {
        &self.core
    }

    pub fn counterpart(&self) -> Option<&ParticipantId> {
        match &self.tracking {
            Tracking::Pair { counterpart, .. } => counterpart.as_ref(),
            _ => None,
        }
    }

    /// Peers a group member has heard from
    pub fn peers(&self) -> Vec<&ParticipantId> {
        match &self.tracking {
            Tracking::Member { peers, .. } => peers.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// The turn this participant would take in `round`.
    ///
    /// Follow-ups without any context fall back to an opening.
    pub fn next_turn(&self, round: u32) -> Turn {
        if round <= 1 {
            return Turn::Opening;
        }

        match &self.tracking {
            Tracking::Solo => self
                .core
                .latest_own()
                .map(|previous| Turn::Revision {
                    previous: previous.clone(),
                })
                .unwrap_or(Turn::Opening),
            Tracking::Pair {
                last_counterpart_message,
                ..
            } => last_counterpart_message
                .as_ref()
                .map(|counterpart| Turn::Rebuttal {
                    counterpart: counterpart.clone(),
                })
                .unwrap_or(Turn::Opening),
            Tracking::Member { contributions, .. } => {
                if contributions.is_empty() {
                    Turn::Opening
                } else {
                    Turn::Collaboration {
                        contributions: contributions.clone(),
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Participant for DebateAgent {
    fn id(&self) -> &ParticipantId {
        self.core.id()
    }

    fn role(&self) -> ParticipantRole {
        self.role
    }

    fn receive(&mut self, message: &Message) {
        if message.is_from(self.core.id()) {
            return;
        }

        self.core.record(message.clone());

        match &mut self.tracking {
            Tracking::Solo => {}
            Tracking::Pair {
                counterpart,
                last_counterpart_message,
            } => {
                if counterpart.as_ref().is_none_or(|c| message.is_from(c)) {
                    *counterpart = Some(message.sender().clone());
                    *last_counterpart_message = Some(message.clone());
                }
            }
            Tracking::Member {
                peers,
                contributions,
            } => {
                peers.insert(message.sender().clone());
                contributions.push(message.clone());
            }
        }
    }

    async fn respond(
        &mut self,
        round: u32,
        receiver: Recipient,
    ) -> Result<Message, GenerationError> {
        let request = TurnRequest {
            participant: self.core.id().clone(),
            role: self.role,
            topic: self.core.topic().to_string(),
            round,
            turn: self.next_turn(round),
        };

        let content = self.composer.compose(&request).await?;
        let message = self.core.create_message(content, receiver, round);
        self.core.record(message.clone());

        if let Tracking::Member { contributions, .. } = &mut self.tracking {
            contributions.clear();
        }

        Ok(message)
    }

    fn final_answer(&self) -> String {
        match self.role {
            ParticipantRole::Critic => self
                .counterpart()
                .and_then(|c| self.core.latest_from(c))
                .map(|m| m.content().to_string())
                .unwrap_or_else(|| NO_COUNTERPART_ANSWER.to_string()),
            _ => self
                .core
                .latest_own()
                .map(|m| m.content().to_string())
                .unwrap_or_else(|| NO_ANSWER_YET.to_string()),
        }
    }

    fn message_count(&self) -> usize {
        self.core.history().len()
    }
}
