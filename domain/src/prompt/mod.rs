//! Prompt domain
//!
//! Templates for participant turns and the judge's final decision.

mod template;

pub use template::{DebatePrompts, JudgePrompts, PromptSet, RenderedPrompt};
