//! CLI command definitions

use clap::{Parser, ValueEnum};
use debate_domain::{ArbiterKind, DebateMode};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Transcript by round, final answers and verdict
    Full,
    /// Final answers and verdict only
    Answers,
    /// Summary as JSON
    Json,
}

impl From<OutputFormat> for debate_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Answers => Self::Answers,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for agent-debate
#[derive(Parser, Debug)]
#[command(name = "agent-debate")]
#[command(author, version, about = "Multi-agent debate - LLM participants argue toward an answer")]
#[command(long_about = r#"
agent-debate puts one or more LLM participants on a question for a fixed
number of rounds:

  single  one participant revises its own answer each round
  dual    a solver and a critic exchange point-to-point messages
  multi   three or more members broadcast, an arbiter decides

Configuration files are merged in this order (later wins):
1. ~/.config/agent-debate/config.toml   Global config
2. ./debate.toml                        Project-level config
3. --config <path>                      Explicit config file
4. AGENT_DEBATE_* environment variables
5. Command-line flags

Example:
  agent-debate "Is 1001 prime?"
  agent-debate --mode dual --rounds 3 "Prove that sqrt(2) is irrational"
  agent-debate --mode multi --agents 4 --arbiter tally --dataset gsm8k.jsonl --limit 10
"#)]
pub struct Cli {
    /// The question to debate
    #[arg(required_unless_present_any = ["dataset", "show_config"], conflicts_with = "dataset")]
    pub topic: Option<String>,

    /// JSONL file of {"question", "answer"} records to debate one by one
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Maximum number of dataset records to run
    #[arg(long, value_name = "N", requires = "dataset")]
    pub limit: Option<usize>,

    /// Debate mode (single, dual, multi)
    #[arg(short, long)]
    pub mode: Option<DebateMode>,

    /// Number of rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Member count in multi mode
    #[arg(short, long)]
    pub agents: Option<usize>,

    /// Arbitration for multi mode (deliberative, tally)
    #[arg(long)]
    pub arbiter: Option<ArbiterKind>,

    /// Model used by participants
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model used by the deliberative arbiter
    #[arg(long, value_name = "MODEL")]
    pub judge_model: Option<String>,

    /// Persona text for the next participant (repeatable, in roster order)
    #[arg(short, long, value_name = "TEXT")]
    pub persona: Vec<String>,

    /// Use the offline echo backend instead of the configured provider
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Directory for JSON debate reports
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Directory for JSONL debate transcripts
    #[arg(long, value_name = "DIR")]
    pub transcript_dir: Option<PathBuf>,

    /// Directory for daily-rotated operation logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_with_overrides() {
        let cli = Cli::try_parse_from([
            "agent-debate",
            "--mode",
            "pairwise",
            "-r",
            "3",
            "--arbiter",
            "voting",
            "-p",
            "You are a skeptic.",
            "-p",
            "You are an optimist.",
            "-vv",
            "Is 1001 prime?",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("Is 1001 prime?"));
        assert_eq!(cli.mode, Some(DebateMode::Dual));
        assert_eq!(cli.rounds, Some(3));
        assert_eq!(cli.arbiter, Some(ArbiterKind::Tally));
        assert_eq!(cli.persona.len(), 2);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_topic_required_without_dataset() {
        assert!(Cli::try_parse_from(["agent-debate"]).is_err());
        assert!(Cli::try_parse_from(["agent-debate", "--show-config"]).is_ok());

        let cli =
            Cli::try_parse_from(["agent-debate", "--dataset", "gsm.jsonl", "--limit", "5"]).unwrap();
        assert_eq!(cli.dataset, Some(PathBuf::from("gsm.jsonl")));
        assert_eq!(cli.limit, Some(5));
    }

    #[test]
    fn test_topic_conflicts_with_dataset() {
        assert!(Cli::try_parse_from(["agent-debate", "--dataset", "gsm.jsonl", "q"]).is_err());
        assert!(Cli::try_parse_from(["agent-debate", "--limit", "5", "q"]).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["agent-debate", "--mode", "trio", "q"]).is_err());
        assert!(Cli::try_parse_from(["agent-debate", "--arbiter", "coin", "q"]).is_err());
        assert!(Cli::try_parse_from(["agent-debate", "-o", "xml", "q"]).is_err());
    }

    #[test]
    fn test_output_format_conversion() {
        let cli = Cli::try_parse_from(["agent-debate", "-o", "json", "q"]).unwrap();
        let format: debate_domain::OutputFormat = cli.output.unwrap().into();
        assert_eq!(format, debate_domain::OutputFormat::Json);
    }
}
