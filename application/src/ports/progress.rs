//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use debate_domain::{DebateState, DebateSummary, Message, Topology};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, ...).
pub trait DebateProgressNotifier: Send + Sync {
    /// Called once before the first round
    fn on_debate_start(&self, topic: &str, topology: Topology, total_rounds: u32);

    /// Called when a round opens
    fn on_round_start(&self, round: u32, total_rounds: u32);

    /// Called after each participant produced its message
    fn on_message(&self, _message: &Message) {}

    /// Called when a round closes, with a snapshot of progress and history
    fn on_round_complete(&self, round: u32, state: &DebateState);

    /// Called before the arbiter is consulted (group debates only)
    fn on_arbitration_start(&self) {}

    /// Called once the summary is assembled
    fn on_debate_complete(&self, _summary: &DebateSummary) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_debate_start(&self, _topic: &str, _topology: Topology, _total_rounds: u32) {}
    fn on_round_start(&self, _round: u32, _total_rounds: u32) {}
    fn on_round_complete(&self, _round: u32, _state: &DebateState) {}
}
