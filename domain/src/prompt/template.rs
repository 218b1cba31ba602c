//! Prompt templates for debate turns and arbitration
//!
//! Templates are plain strings with `{placeholder}` slots:
//!
//! | Placeholder             | Filled with                                   |
//! |-------------------------|-----------------------------------------------|
//! | `{question}`            | the debate topic                              |
//! | `{previous_answer}`     | the participant's own previous message        |
//! | `{previous_message}`    | the counterpart's latest message              |
//! | `{other_contributions}` | peer messages since the last own turn         |
//! | `{answers_text}`        | final-round answers handed to the judge       |

use crate::arbiter::parsing::latest_by_sender;
use crate::core::error::DomainError;
use crate::message::Message;
use crate::participant::{ParticipantRole, Turn, TurnRequest};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// System prompt plus opening and follow-up user prompts for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub system: String,
    pub initial: String,
    pub follow_up: String,
}

/// Prompts used by the deliberative arbiter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgePrompts {
    pub system: String,
    pub final_judgment: String,
}

impl Default for JudgePrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a fair and objective judge who carefully analyzes and evaluates solutions.
Your role is to:
1. Understand each perspective thoroughly
2. Compare different approaches objectively
3. Identify strengths and weaknesses
4. Make well-reasoned decisions
5. Provide clear explanations for your judgments"#
                .to_string(),
            final_judgment: r#"Please analyze the following solutions from different perspectives and determine which solution or combination of solutions is most appropriate.

Solutions:
{answers_text}

Please:
1. Analyze each agent's unique perspective and reasoning
2. Compare the different approaches and insights
3. Determine which solution(s) have the strongest reasoning and evidence
4. If multiple solutions have merit, synthesize them into a comprehensive solution
5. Explain why the chosen solution is the most appropriate

Finish with a single line of the form "Answer: <final answer>"."#
                .to_string(),
        }
    }
}

/// A rendered prompt pair ready for a generation backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Full prompt configuration of a debate
///
/// Passed explicitly to whoever renders prompts; nothing here touches the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebatePrompts {
    pub solo: PromptSet,
    pub solver: PromptSet,
    pub critic: PromptSet,
    pub member: PromptSet,
    pub judge: JudgePrompts,
}

impl Default for DebatePrompts {
    fn default() -> Self {
        Self {
            solo: PromptSet {
                system: "You are a careful analyst. You work through a problem step by step, \
                         then check your own reasoning for mistakes."
                    .to_string(),
                initial: r#"Analyze the following question and solve it step by step:

{question}

End your response with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
                follow_up: r#"Question:
{question}

Your previous analysis:
{previous_answer}

Verify every step of the previous analysis. Correct any mistakes you find and give an improved solution.
End your response with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
            },
            solver: PromptSet {
                system: "You are a solver in a two-party debate. You propose a solution and \
                         defend or revise it in response to criticism."
                    .to_string(),
                initial: r#"Propose a solution to the following question:

{question}

Explain your reasoning and end with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
                follow_up: r#"Question:
{question}

The critic responded:
{previous_message}

Address each point raised. Revise your solution where the criticism is valid and defend it where it is not.
End with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
            },
            critic: PromptSet {
                system: "You are a critic in a two-party debate. You examine proposed solutions \
                         for errors, gaps and unstated assumptions."
                    .to_string(),
                initial: r#"You will critique solutions to the following question:

{question}

Outline what a correct solution must establish and which mistakes are most likely."#
                    .to_string(),
                follow_up: r#"Question:
{question}

The solver proposed:
{previous_message}

Critique this solution. Point out specific errors and missing steps, and say whether the final answer is correct."#
                    .to_string(),
            },
            member: PromptSet {
                system: "You are one of several experts collaborating on a question. You build \
                         on the contributions of the others and correct them where needed."
                    .to_string(),
                initial: r#"Share your initial approach and solution to the following question:

{question}

End with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
                follow_up: r#"Question:
{question}

Contributions from the other experts:
{other_contributions}

Build on the strongest ideas above and correct any errors. Give your updated solution.
End with a single line of the form "Answer: <final answer>"."#
                    .to_string(),
            },
            judge: JudgePrompts::default(),
        }
    }
}

impl DebatePrompts {
    pub fn for_role(&self, role: ParticipantRole) -> &PromptSet {
        match role {
            ParticipantRole::Solo => &self.solo,
            ParticipantRole::Solver => &self.solver,
            ParticipantRole::Critic => &self.critic,
            ParticipantRole::Member => &self.member,
        }
    }

    /// Replace one template by its flat key (`solver_follow_up`, `judge_system`, ...)
    pub fn apply_override(&mut self, key: &str, value: impl Into<String>) -> Result<(), DomainError> {
        let slot = match key {
            "solo_system" => &mut self.solo.system,
            "solo_initial" => &mut self.solo.initial,
            "solo_follow_up" => &mut self.solo.follow_up,
            "solver_system" => &mut self.solver.system,
            "solver_initial" => &mut self.solver.initial,
            "solver_follow_up" => &mut self.solver.follow_up,
            "critic_system" => &mut self.critic.system,
            "critic_initial" => &mut self.critic.initial,
            "critic_follow_up" => &mut self.critic.follow_up,
            "member_system" => &mut self.member.system,
            "member_initial" => &mut self.member.initial,
            "member_follow_up" => &mut self.member.follow_up,
            "judge_system" => &mut self.judge.system,
            "judge_final_judgment" => &mut self.judge.final_judgment,
            other => return Err(DomainError::UnknownPromptKey(other.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    /// Render a participant turn, prefixing the persona to the system prompt
    pub fn render_turn(&self, request: &TurnRequest, persona: Option<&str>) -> RenderedPrompt {
        let set = self.for_role(request.role);

        let system = match persona.map(str::trim).filter(|p| !p.is_empty()) {
            Some(persona) => format!("{}\n\n{}", persona, set.system),
            None => set.system.clone(),
        };

        let user = match &request.turn {
            Turn::Opening => fill(&set.initial, &[("question", request.topic.as_str())]),
            Turn::Revision { previous } => fill(
                &set.follow_up,
                &[
                    ("question", request.topic.as_str()),
                    ("previous_answer", previous.content()),
                ],
            ),
            Turn::Rebuttal { counterpart } => fill(
                &set.follow_up,
                &[
                    ("question", request.topic.as_str()),
                    ("previous_message", counterpart.content()),
                ],
            ),
            Turn::Collaboration { contributions } => fill(
                &set.follow_up,
                &[
                    ("question", request.topic.as_str()),
                    ("other_contributions", answers_text(contributions).as_str()),
                ],
            ),
        };

        RenderedPrompt { system, user }
    }

    /// Render the judge prompt over the final round's messages
    pub fn render_judgment(&self, messages: &[Message]) -> RenderedPrompt {
        RenderedPrompt {
            system: self.judge.system.clone(),
            user: fill(
                &self.judge.final_judgment,
                &[("answers_text", answers_text(&latest_by_sender(messages)).as_str())],
            ),
        }
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}

fn answers_text<M: Borrow<Message>>(messages: &[M]) -> String {
    messages
        .iter()
        .map(|m| {
            let m: &Message = m.borrow();
            format!("Agent {}:\n{}", m.sender(), m.content())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant_id::{ParticipantId, Recipient};

    fn request(role: ParticipantRole, turn: Turn) -> TurnRequest {
        TurnRequest {
            participant: ParticipantId::new("a"),
            role,
            topic: "What is 2 + 2?".to_string(),
            round: 2,
            turn,
        }
    }

    fn broadcast(sender: &str, content: &str) -> Message {
        Message::new(content, ParticipantId::new(sender), Recipient::Broadcast, 2)
    }

    #[test]
    fn test_opening_contains_question() {
        let prompts = DebatePrompts::default();
        let rendered = prompts.render_turn(&request(ParticipantRole::Solo, Turn::Opening), None);
        assert!(rendered.user.contains("What is 2 + 2?"));
        assert_eq!(rendered.system, prompts.solo.system);
    }

    #[test]
    fn test_persona_is_prepended() {
        let prompts = DebatePrompts::default();
        let rendered = prompts.render_turn(
            &request(ParticipantRole::Member, Turn::Opening),
            Some("You are a retired mathematics professor."),
        );
        assert!(rendered.system.starts_with("You are a retired mathematics professor.\n\n"));
        assert!(rendered.system.ends_with(&prompts.member.system));

        let blank = prompts.render_turn(&request(ParticipantRole::Member, Turn::Opening), Some("  "));
        assert_eq!(blank.system, prompts.member.system);
    }

    #[test]
    fn test_rebuttal_includes_counterpart_message() {
        let prompts = DebatePrompts::default();
        let turn = Turn::Rebuttal {
            counterpart: broadcast("critic", "Step 3 drops a sign."),
        };
        let rendered = prompts.render_turn(&request(ParticipantRole::Solver, turn), None);
        assert!(rendered.user.contains("Step 3 drops a sign."));
        assert!(!rendered.user.contains("{previous_message}"));
    }

    #[test]
    fn test_collaboration_lists_contributions() {
        let prompts = DebatePrompts::default();
        let turn = Turn::Collaboration {
            contributions: vec![broadcast("b", "I get 4."), broadcast("c", "Also 4.")],
        };
        let rendered = prompts.render_turn(&request(ParticipantRole::Member, turn), None);
        assert!(rendered.user.contains("Agent b:\nI get 4.\n\nAgent c:\nAlso 4."));
    }

    #[test]
    fn test_judgment_keeps_latest_answer_per_sender() {
        let prompts = DebatePrompts::default();
        let messages = vec![
            broadcast("a", "first a"),
            broadcast("b", "only b"),
            broadcast("a", "second a"),
        ];
        let rendered = prompts.render_judgment(&messages);
        assert!(rendered.user.contains("Agent a:\nsecond a\n\nAgent b:\nonly b"));
        assert!(!rendered.user.contains("first a"));
        assert_eq!(rendered.system, prompts.judge.system);
    }

    #[test]
    fn test_apply_override() {
        let mut prompts = DebatePrompts::default();
        prompts
            .apply_override("critic_follow_up", "Critique: {previous_message}")
            .unwrap();
        assert_eq!(prompts.critic.follow_up, "Critique: {previous_message}");

        assert_eq!(
            prompts.apply_override("critic_closing", "x"),
            Err(DomainError::UnknownPromptKey("critic_closing".to_string()))
        );
    }
}
