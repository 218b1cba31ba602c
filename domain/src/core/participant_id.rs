//! Participant identity and message addressing

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire value used for broadcast receivers.
pub const BROADCAST: &str = "all";

/// Opaque participant identifier (Value Object)
///
/// Non-empty and never equal to the reserved broadcast address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new participant id
    ///
    /// # Panics
    /// Panics if the id is empty or equals the broadcast address
    pub fn new(id: impl Into<String>) -> Self {
        match Self::try_new(id) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a participant id, rejecting empty and reserved values
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidParticipantId(
                "id cannot be empty".to_string(),
            ));
        }
        if trimmed == BROADCAST {
            return Err(DomainError::InvalidParticipantId(format!(
                "'{BROADCAST}' is reserved for broadcast messages"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId::new(s)
    }
}

/// Receiver of a message: one participant, or everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    Participant(ParticipantId),
    Broadcast,
}

impl Recipient {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Recipient::Broadcast)
    }

    /// The addressed participant, if this is a point-to-point receiver
    pub fn participant(&self) -> Option<&ParticipantId> {
        match self {
            Recipient::Participant(id) => Some(id),
            Recipient::Broadcast => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Recipient::Participant(id) => id.as_str(),
            Recipient::Broadcast => BROADCAST,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ParticipantId> for Recipient {
    fn from(id: ParticipantId) -> Self {
        Recipient::Participant(id)
    }
}

impl std::str::FromStr for Recipient {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == BROADCAST {
            Ok(Recipient::Broadcast)
        } else {
            ParticipantId::try_new(s).map(Recipient::Participant)
        }
    }
}

impl Serialize for Recipient {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
