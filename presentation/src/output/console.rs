//! Console output for finished debates

use colored::Colorize;
use debate_application::RunDebateOutput;
use debate_domain::{DebateSummary, Message, OutputFormat};
use std::collections::BTreeMap;

const WIDTH: usize = 60;

/// Formats debate results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render in the requested format
    pub fn render(output: &RunDebateOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(output),
            OutputFormat::Answers => Self::format_answers(&output.summary),
            OutputFormat::Json => Self::format_json(&output.summary),
        }
    }

    /// Transcript grouped by round, then answers and verdict
    pub fn format(output: &RunDebateOutput) -> String {
        let summary = &output.summary;
        let mut text = String::new();

        text.push_str(&Self::header("Debate Results"));
        text.push('\n');
        text.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), summary.topic));
        text.push_str(&format!(
            "{} {} ({} rounds)\n",
            "Topology:".cyan().bold(),
            summary.topology.display_name(),
            summary.total_rounds
        ));
        text.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            summary.participants.join(", ")
        ));

        let mut rounds: BTreeMap<u32, Vec<&Message>> = BTreeMap::new();
        for message in &output.transcript {
            rounds.entry(message.round_number()).or_default().push(message);
        }
        for (round, messages) in rounds {
            text.push_str(&Self::section_header(&format!("Round {}", round)));
            for message in messages {
                text.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} → {} ──", message.sender(), message.receiver())
                        .yellow()
                        .bold(),
                    message.content()
                ));
            }
        }

        text.push_str(&Self::answers_section(summary));

        if output.dropped_deliveries > 0 {
            text.push_str(&format!(
                "\n{} {} message(s) addressed to unknown participants\n",
                "Dropped:".red().bold(),
                output.dropped_deliveries
            ));
        }

        text.push_str(&Self::footer());
        text
    }

    /// Final answers and verdict only (concise output)
    pub fn format_answers(summary: &DebateSummary) -> String {
        let mut text = format!("{}\n\n", "=== Debate Conclusion ===".cyan().bold());
        text.push_str(&format!("{} {}\n", "Q:".bold(), summary.topic));
        text.push_str(&format!(
            "{} {}, {} rounds, {} messages\n",
            "Setup:".dimmed(),
            summary.topology.display_name(),
            summary.total_rounds,
            summary.total_messages()
        ));
        text.push_str(&Self::answers_section(summary));
        text
    }

    /// Summary as pretty JSON
    pub fn format_json(summary: &DebateSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    fn answers_section(summary: &DebateSummary) -> String {
        let mut text = Self::section_header("Final Answers");
        for state in &summary.participant_states {
            text.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({}, {} messages) ──", state.id, state.role, state.total_messages)
                    .green()
                    .bold(),
                state.final_answer
            ));
        }

        if let Some(verdict) = &summary.final_verdict {
            text.push_str(&Self::section_header("Verdict"));
            text.push_str(&format!("\n{}\n", verdict));
        }
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(WIDTH);
        format!("{}\n{:^WIDTH$}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(WIDTH).cyan())
    }
}
