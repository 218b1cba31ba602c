//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished debate is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Transcript by round, final answers and verdict
    Full,
    /// Final answers and verdict only (default)
    #[default]
    Answers,
    /// The summary as JSON
    Json,
}
