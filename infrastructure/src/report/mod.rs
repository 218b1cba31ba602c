//! Debate report persistence

mod analytics;
mod writer;

pub use analytics::{DebateAnalytics, KeyPoint};
pub use writer::{DebateReport, JsonReportWriter, ReportError};
