//! Debate history
//!
//! [`HistoryManager`] owns every recorded message and answers queries by
//! round, by participant, and over a sliding window of rounds.

pub mod manager;

pub use manager::{HistoryManager, HistoryStatistics};
