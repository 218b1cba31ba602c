//! JSONL question datasets for batch runs
//!
//! One record per line: `{"question": "...", "answer": "..."}`. The answer
//! is optional and may carry worked reasoning ending in `#### <value>`.

use debate_domain::extract_answer;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Empty question on line {0}")]
    EmptyQuestion(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetRecord {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

impl DatasetRecord {
    /// The bare reference answer (`72` from `... #### 72`)
    pub fn expected_answer(&self) -> Option<String> {
        self.answer.as_deref().and_then(extract_answer)
    }
}

/// Load up to `limit` records, skipping blank lines
pub fn load_dataset(
    path: impl AsRef<Path>,
    limit: Option<usize>,
) -> Result<Vec<DatasetRecord>, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text, limit)
}

fn parse_records(text: &str, limit: Option<usize>) -> Result<Vec<DatasetRecord>, DatasetError> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if records.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let line_number = index + 1;
        let record: DatasetRecord =
            serde_json::from_str(line).map_err(|source| DatasetError::Parse {
                line: line_number,
                source,
            })?;
        if record.question.trim().is_empty() {
            return Err(DatasetError::EmptyQuestion(line_number));
        }
        records.push(record);
    }

    Ok(records)
}
