//! Post-debate analytics stored alongside each report

use debate_domain::{DebateSummary, Message};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Words that mark a sentence as carrying an argument
const KEY_POINT_MARKERS: [&str; 5] = ["because", "therefore", "however", "moreover", "conclude"];

/// Argumentative sentences from one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub round: u32,
    pub sender: String,
    pub points: Vec<String>,
}

/// Quality and timing figures derived from a finished debate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebateAnalytics {
    pub total_messages: usize,
    /// Messages authored by each participant
    pub messages_per_sender: BTreeMap<String, usize>,
    /// Mean message length in characters
    pub average_message_length: f64,
    /// Share of messages that mention at least one topic word
    pub topic_consistency: f64,
    pub rounds: usize,
    /// Sum of the wall time of every ended round
    pub total_duration_secs: f64,
    pub average_round_secs: f64,
    pub key_points: Vec<KeyPoint>,
}

impl DebateAnalytics {
    pub fn from_summary(summary: &DebateSummary) -> Self {
        let messages: Vec<&Message> = summary
            .history_statistics
            .messages_per_round
            .values()
            .flatten()
            .collect();

        let mut messages_per_sender = BTreeMap::new();
        for message in &messages {
            *messages_per_sender
                .entry(message.sender().to_string())
                .or_insert(0) += 1;
        }

        let total_length: usize = messages.iter().map(|m| m.content().chars().count()).sum();

        let topic_words: BTreeSet<String> = summary
            .topic
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        let on_topic = messages
            .iter()
            .filter(|m| {
                let content = m.content().to_lowercase();
                topic_words.iter().any(|w| content.contains(w.as_str()))
            })
            .count();

        let durations: Vec<f64> = summary
            .round_statistics
            .values()
            .filter_map(|stats| stats.duration())
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
            .collect();
        let total_duration_secs: f64 = durations.iter().sum();

        Self {
            total_messages: messages.len(),
            messages_per_sender,
            average_message_length: ratio(total_length as f64, messages.len()),
            topic_consistency: ratio(on_topic as f64, messages.len()),
            rounds: summary.history_statistics.messages_per_round.len(),
            total_duration_secs,
            average_round_secs: ratio(total_duration_secs, durations.len()),
            key_points: messages.iter().filter_map(|m| key_point(m)).collect(),
        }
    }
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

fn key_point(message: &Message) -> Option<KeyPoint> {
    let points: Vec<String> = message
        .content()
        .split(". ")
        .map(str::trim)
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            KEY_POINT_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .map(str::to_string)
        .collect();

    (!points.is_empty()).then(|| KeyPoint {
        round: message.round_number(),
        sender: message.sender().to_string(),
        points,
    })
}
