//! Infrastructure layer for agent-debate
//!
//! Adapters implementing the application ports: generation backends,
//! transcript logging, configuration files, reports and datasets.

pub mod config;
pub mod dataset;
pub mod logging;
pub mod providers;
pub mod report;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileDebateConfig, FileModelsConfig, FileOutputConfig,
    FileParticipantConfig, FileProviderConfig, ProviderKind,
};
pub use dataset::{DatasetError, DatasetRecord, load_dataset};
pub use logging::JsonlConversationLogger;
pub use providers::{EchoBackend, OpenAiBackend, RetryPolicy, build_backend};
pub use report::{DebateAnalytics, DebateReport, JsonReportWriter, ReportError};
