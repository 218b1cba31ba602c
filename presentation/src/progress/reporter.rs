//! Progress reporting while a debate runs

use colored::Colorize;
use debate_application::DebateProgressNotifier;
use debate_domain::{DebateState, DebateSummary, Message, Topology};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Progress bar over rounds, with a spinner message per participant turn
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_debate_start(&self, _topic: &str, topology: Topology, total_rounds: u32) {
        let bar = ProgressBar::new(u64::from(total_rounds));
        bar.set_style(Self::round_style());
        bar.set_prefix(topology.display_name());
        bar.set_message("Starting...");
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_round_start(&self, round: u32, total_rounds: u32) {
        self.with_bar(|bar| bar.set_message(format!("round {}/{}", round, total_rounds)));
    }

    fn on_message(&self, message: &Message) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "round {}: {} {}",
                message.round_number(),
                "v".green(),
                message.sender()
            ))
        });
    }

    fn on_round_complete(&self, _round: u32, state: &DebateState) {
        self.with_bar(|bar| bar.set_position(u64::from(state.progress.current_round)));
    }

    fn on_arbitration_start(&self) {
        self.with_bar(|bar| bar.set_message("arbiter deciding..."));
    }

    fn on_debate_complete(&self, summary: &DebateSummary) {
        let taken = self.bar.lock().ok().and_then(|mut guard| guard.take());
        if let Some(bar) = taken {
            bar.finish_with_message(format!(
                "{} ({} messages)",
                "complete!".green(),
                summary.total_messages()
            ));
        }
    }
}

/// Line-based progress for non-interactive terminals
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_debate_start(&self, topic: &str, topology: Topology, total_rounds: u32) {
        println!(
            "{} {} debate, {} rounds: {}",
            "->".cyan(),
            topology.display_name().bold(),
            total_rounds,
            topic
        );
    }

    fn on_round_start(&self, round: u32, total_rounds: u32) {
        println!("{} Round {}/{}", "->".cyan(), round, total_rounds);
    }

    fn on_message(&self, message: &Message) {
        println!("  {} {} → {}", "v".green(), message.sender(), message.receiver());
    }

    fn on_round_complete(&self, round: u32, state: &DebateState) {
        let message_count = state
            .statistics
            .messages_per_round
            .get(&round)
            .map_or(0, Vec::len);
        println!(
            "  {} messages ({:.0}% complete)\n",
            message_count, state.progress.percent_complete
        );
    }

    fn on_arbitration_start(&self) {
        println!("{} Arbitration", "->".cyan());
    }
}
