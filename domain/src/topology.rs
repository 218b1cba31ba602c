//! Interaction topology, derived from the number of participants

use serde::{Deserialize, Serialize};

/// Fan-out pattern of a debate round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// One participant talking to itself
    SelfDialogue,
    /// Two participants alternating point-to-point
    Pairwise,
    /// Three or more participants broadcasting to each other
    Group,
}

impl Topology {
    /// Topology for `count` registered participants; `None` when empty
    pub fn from_participant_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Topology::SelfDialogue),
            2 => Some(Topology::Pairwise),
            _ => Some(Topology::Group),
        }
    }

    /// Only group debates are settled by an arbiter
    pub fn requires_arbitration(&self) -> bool {
        matches!(self, Topology::Group)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::SelfDialogue => "self_dialogue",
            Topology::Pairwise => "pairwise",
            Topology::Group => "group",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Topology::SelfDialogue => "Self-Dialogue",
            Topology::Pairwise => "Pairwise",
            Topology::Group => "Group",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
