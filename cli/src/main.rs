//! CLI entrypoint for agent-debate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use debate_application::{
    DebateConfig, DebateProgressNotifier, GenerationBackend, NoProgress, RunDebateInput,
    RunDebateOutput, RunDebateUseCase,
};
use debate_domain::{OutputFormat, Topic};
use debate_infrastructure::{
    ConfigLoader, DebateReport, FileConfig, FileParticipantConfig, JsonReportWriter,
    JsonlConversationLogger, ProviderKind, build_backend, load_dataset,
};
use debate_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// One question to debate
struct Job {
    id: String,
    question: String,
    ground_truth: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    info!("Starting agent-debate");

    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut file_config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", toml::to_string_pretty(&redacted(&file_config))?);
        return Ok(());
    }

    let config = file_config
        .to_debate_config()
        .context("Invalid configuration")?;
    let backend = build_backend(&file_config.provider)?;
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file_config.output.format)
        .unwrap_or_default();

    let jobs = match (&cli.dataset, &cli.topic) {
        (Some(path), _) => load_dataset(path, cli.limit)?
            .into_iter()
            .enumerate()
            .map(|(i, record)| Job {
                id: format!("q{}", i + 1),
                question: record.question,
                ground_truth: record.answer,
            })
            .collect::<Vec<_>>(),
        (None, Some(topic)) => vec![Job {
            id: "debate".to_string(),
            question: topic.clone(),
            ground_truth: None,
        }],
        (None, None) => bail!("A topic or --dataset is required"),
    };

    let reports = file_config.output.report_dir.as_ref().map(JsonReportWriter::new);
    let batch = jobs.len() > 1;
    let mut scored = 0;
    let mut correct = 0;
    let mut failed = 0;

    for job in jobs {
        let output = match run_job(&job, &config, &backend, &file_config, cli.quiet).await {
            Ok(output) => output,
            Err(e) if batch => {
                error!("Debate {} failed: {:#}", job.id, e);
                failed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        println!("{}", ConsoleFormatter::render(&output, format));

        let report = DebateReport::new(&job.id, &config, output.summary, job.ground_truth);
        if let Some(is_correct) = report.correct {
            scored += 1;
            if is_correct {
                correct += 1;
            }
            if !cli.quiet {
                let mark = if is_correct { "correct".green() } else { "incorrect".red() };
                println!(
                    "{} predicted {}, {}",
                    job.id.bold(),
                    report.predicted_answer.as_deref().unwrap_or("-"),
                    mark
                );
            }
        }

        if let Some(writer) = &reports {
            match writer.write(&report) {
                Ok(path) => info!("Report for {} written to {}", job.id, path.display()),
                Err(e) => warn!("Could not save report for {}: {}", job.id, e),
            }
        }
    }

    if batch {
        println!(
            "{} {}/{} correct, {} failed",
            "Batch:".cyan().bold(),
            correct,
            scored,
            failed
        );
    }

    Ok(())
}

async fn run_job(
    job: &Job,
    config: &DebateConfig,
    backend: &Arc<dyn GenerationBackend>,
    file_config: &FileConfig,
    quiet: bool,
) -> Result<RunDebateOutput> {
    let topic = Topic::try_from(job.question.as_str())?;

    let mut use_case = RunDebateUseCase::new(Arc::clone(backend));
    if let Some(dir) = &file_config.output.transcript_dir {
        match JsonlConversationLogger::in_dir(dir, &job.id) {
            Ok(logger) => {
                info!("Transcript: {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!("Transcript disabled, cannot write to {}: {}", dir.display(), e),
        }
    }

    let progress: Box<dyn DebateProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let input = RunDebateInput::new(topic, config.clone());
    Ok(use_case
        .execute_with_progress(input, progress.as_ref())
        .await?)
}

/// Console logs at the `-v` level (`RUST_LOG` wins), plus daily files with `--log-dir`
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agent-debate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// CLI flags sit on top of every file and environment source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.debate.mode = mode.to_string();
    }
    if let Some(rounds) = cli.rounds {
        config.debate.rounds = rounds;
    }
    if let Some(agents) = cli.agents {
        config.debate.agents = agents;
    }
    if let Some(arbiter) = cli.arbiter {
        config.debate.arbiter = arbiter.to_string();
    }
    if let Some(model) = &cli.model {
        config.models.participant = model.clone();
    }
    if let Some(judge) = &cli.judge_model {
        config.models.judge = Some(judge.clone());
    }
    if cli.dry_run {
        config.provider.kind = ProviderKind::Echo;
    }
    if let Some(dir) = &cli.report_dir {
        config.output.report_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.transcript_dir {
        config.output.transcript_dir = Some(dir.clone());
    }

    for (index, persona) in cli.persona.iter().enumerate() {
        match config.participants.get_mut(index) {
            Some(participant) => participant.persona = Some(persona.clone()),
            None => config.participants.push(FileParticipantConfig {
                persona: Some(persona.clone()),
                ..Default::default()
            }),
        }
    }
}

fn redacted(config: &FileConfig) -> FileConfig {
    let mut config = config.clone();
    if config.provider.api_key.is_some() {
        config.provider.api_key = Some("********".to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{ArbiterKind, DebateMode, DomainError};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agent-debate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = FileConfig::default();
        config.debate.rounds = 5;
        config.models.judge = Some("file-judge".to_string());

        let cli = parse(&[
            "--mode", "multi", "--agents", "4", "--arbiter", "vote", "-r", "1", "--dry-run", "q",
        ]);
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.provider.kind, ProviderKind::Echo);
        let debate = config.to_debate_config().unwrap();
        assert_eq!(debate.mode, DebateMode::Multi);
        assert_eq!(debate.agents, 4);
        assert_eq!(debate.arbiter, ArbiterKind::Tally);
        assert_eq!(debate.rounds, 1);
        assert_eq!(debate.judge_model, "file-judge");
    }

    #[test]
    fn test_personas_fill_participants_in_order() {
        let mut config = FileConfig::default();
        config.participants.push(FileParticipantConfig {
            id: Some("alice".to_string()),
            ..Default::default()
        });

        let cli = parse(&["-p", "Skeptic.", "-p", "Optimist.", "q"]);
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.participants.len(), 2);
        assert_eq!(config.participants[0].id.as_deref(), Some("alice"));
        assert_eq!(config.participants[0].persona.as_deref(), Some("Skeptic."));
        assert_eq!(config.participants[1].persona.as_deref(), Some("Optimist."));
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = FileConfig::default();
        config.provider.api_key = Some("sk-secret".to_string());
        let shown = toml::to_string_pretty(&redacted(&config)).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-secret"));
    }

    #[tokio::test]
    async fn test_dry_run_end_to_end() {
        let mut file_config = FileConfig::default();
        let cli = parse(&["--dry-run", "--mode", "multi", "--arbiter", "tally", "What is 6 x 7?"]);
        apply_cli_overrides(&mut file_config, &cli);

        let config = file_config.to_debate_config().unwrap();
        let backend = build_backend(&file_config.provider).unwrap();
        let job = Job {
            id: "q1".to_string(),
            question: "What is 6 x 7?".to_string(),
            ground_truth: Some("#### echo".to_string()),
        };

        let output = run_job(&job, &config, &backend, &file_config, true).await.unwrap();
        assert_eq!(output.summary.participants.len(), 3);
        assert!(output.summary.final_verdict.is_some());

        let report = DebateReport::new(&job.id, &config, output.summary, job.ground_truth);
        assert_eq!(report.predicted_answer.as_deref(), Some("echo"));
        assert_eq!(report.correct, Some(true));
    }

    #[test]
    fn test_single_mode_rejects_extra_personas() {
        let mut file_config = FileConfig::default();
        let cli = parse(&["-p", "One.", "-p", "Two.", "q"]);
        apply_cli_overrides(&mut file_config, &cli);
        let config = file_config.to_debate_config().unwrap();

        let factory = debate_application::ParticipantFactory::new(
            Arc::new(debate_infrastructure::EchoBackend::default()),
            Arc::new(config.prompts.clone()),
            &config.participant_model,
        );
        let result = factory.create_roster("q", config.mode, config.agents, &config.participants);
        assert!(matches!(
            result,
            Err(DomainError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }
}
