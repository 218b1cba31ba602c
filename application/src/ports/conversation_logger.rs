//! Port for structured debate transcripts.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (debate start, every message, round completion, verdict) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured debate event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The writer adds the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "debate_started", "message", "verdict").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging debate events to a structured log.
///
/// The `log` method is synchronous and non-fallible so a broken transcript
/// never aborts a debate; writers drop events they cannot persist.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when transcripts are disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
