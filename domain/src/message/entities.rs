//! Message entity

use crate::core::participant_id::{ParticipantId, Recipient};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a message in a debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    System,
    User,
    Assistant,
    Tool,
    Broadcast,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::System => "system",
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::Tool => "tool",
            MessageKind::Broadcast => "broadcast",
        }
    }
}

/// One turn of a debate (Entity)
///
/// Immutable once built: fields are private and only readable.
/// Serializes to `{content, sender, receiver, round_number, message_type, timestamp}`
/// with an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    sender: ParticipantId,
    receiver: Recipient,
    round_number: u32,
    message_type: MessageKind,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    ///
    /// The kind is `Broadcast` for broadcast receivers and `Assistant` otherwise.
    pub fn new(
        content: impl Into<String>,
        sender: ParticipantId,
        receiver: Recipient,
        round_number: u32,
    ) -> Self {
        let message_type = if receiver.is_broadcast() {
            MessageKind::Broadcast
        } else {
            MessageKind::Assistant
        };
        Self {
            content: content.into(),
            sender,
            receiver,
            round_number,
            message_type,
            timestamp: Utc::now(),
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.message_type = kind;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> &ParticipantId {
        &self.sender
    }

    pub fn receiver(&self) -> &Recipient {
        &self.receiver
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn kind(&self) -> MessageKind {
        self.message_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_broadcast(&self) -> bool {
        self.receiver.is_broadcast()
    }

    /// Whether the message is addressed to its own sender
    pub fn is_self_addressed(&self) -> bool {
        self.receiver.participant() == Some(&self.sender)
    }

    /// Whether `id` authored this message
    pub fn is_from(&self, id: &ParticipantId) -> bool {
        &self.sender == id
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Round {}] {} -> {}: {}",
            self.round_number, self.sender, self.receiver, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    #[test]
    fn test_kind_follows_receiver() {
        let direct = Message::new("x", id("a"), Recipient::Participant(id("b")), 1);
        assert_eq!(direct.kind(), MessageKind::Assistant);

        let broadcast = Message::new("x", id("a"), Recipient::Broadcast, 1);
        assert_eq!(broadcast.kind(), MessageKind::Broadcast);
        assert!(broadcast.is_broadcast());
    }

    #[test]
    fn test_self_addressed() {
        let m = Message::new("x", id("solo"), Recipient::Participant(id("solo")), 1);
        assert!(m.is_self_addressed());
        assert!(m.is_from(&id("solo")));
    }

    #[test]
    fn test_wire_format_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let m = Message::new("42", id("a"), Recipient::Broadcast, 2).with_timestamp(ts);
        let value = serde_json::to_value(&m).unwrap();

        assert_eq!(value["content"], "42");
        assert_eq!(value["sender"], "a");
        assert_eq!(value["receiver"], "all");
        assert_eq!(value["round_number"], 2);
        assert_eq!(value["message_type"], "broadcast");
        assert_eq!(value["timestamp"], "2024-03-01T12:30:00Z");
    }

    #[test]
    fn test_sequence_survives_json_transcript() {
        let messages = vec![
            Message::new("first", id("solver"), Recipient::Participant(id("critic")), 1),
            Message::new("second", id("critic"), Recipient::Participant(id("solver")), 1)
                .with_kind(MessageKind::User),
            Message::new("third", id("solver"), Recipient::Broadcast, 2),
        ];

        let json = serde_json::to_string(&messages).unwrap();
        let restored: Vec<Message> = serde_json::from_str(&json).unwrap();

        // Nanosecond timestamps included
        assert_eq!(restored, messages);
    }

    #[test]
    fn test_display() {
        let m = Message::new("hello", id("a"), Recipient::Broadcast, 3);
        assert_eq!(m.to_string(), "[Round 3] a -> all: hello");
    }
}
