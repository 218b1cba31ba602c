//! Topic value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The question or motion a debate is held on (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Try to create a new topic, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Topic {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Topic::try_new(s.as_str()).ok_or(DomainError::InvalidTopic(s))
    }
}

impl TryFrom<&str> for Topic {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Topic::try_from(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_creation() {
        let t = Topic::try_from("Is 17 prime?").unwrap();
        assert_eq!(t.content(), "Is 17 prime?");
    }

    #[test]
    fn test_blank_topic_is_an_error() {
        assert_eq!(
            Topic::try_from("   "),
            Err(DomainError::InvalidTopic("   ".to_string()))
        );
        assert!(Topic::try_from(String::new()).is_err());
    }

    #[test]
    fn test_try_new() {
        assert!(Topic::try_new("  ").is_none());
        assert!(Topic::try_new("Should we ship on Friday?").is_some());
    }
}
