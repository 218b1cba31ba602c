//! JSON debate reports on disk

use super::analytics::DebateAnalytics;
use chrono::{DateTime, Utc};
use debate_application::DebateConfig;
use debate_domain::{DebateMode, DebateSummary, extract_answer, normalize_answer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistent record of one finished debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateReport {
    pub debate_id: String,
    pub topic: String,
    /// Reference answer from a dataset record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    /// Final answer extracted from the verdict or headline participant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_answer: Option<String>,
    /// Whether the prediction matches the ground truth, when both exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    pub mode: DebateMode,
    pub config: DebateConfig,
    pub summary: DebateSummary,
    #[serde(default)]
    pub analytics: DebateAnalytics,
    pub generated_at: DateTime<Utc>,
}

impl DebateReport {
    pub fn new(
        debate_id: impl Into<String>,
        config: &DebateConfig,
        summary: DebateSummary,
        ground_truth: Option<String>,
    ) -> Self {
        let predicted_answer = summary.headline_answer().and_then(extract_answer);
        let correct = match (&predicted_answer, ground_truth.as_deref().and_then(extract_answer)) {
            (Some(predicted), Some(expected)) => {
                Some(normalize_answer(predicted) == normalize_answer(&expected))
            }
            _ => None,
        };

        Self {
            debate_id: debate_id.into(),
            topic: summary.topic.clone(),
            ground_truth,
            predicted_answer,
            correct,
            mode: config.mode,
            config: config.clone(),
            analytics: DebateAnalytics::from_summary(&summary),
            summary,
            generated_at: Utc::now(),
        }
    }

    /// `<debate_id>_<YYYYmmdd_HHMMSS>.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.json",
            self.debate_id,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Writes reports as pretty-printed JSON into one directory
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the report, creating the directory if needed
    pub fn write(&self, report: &DebateReport) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(report.file_name());
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Saved debate report to {}", path.display());
        Ok(path)
    }

    /// Read back a report written by [`write`](Self::write)
    pub fn load(path: impl AsRef<Path>) -> Result<DebateReport, ReportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}
