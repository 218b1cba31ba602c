//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate_manager;
pub mod run_debate;
