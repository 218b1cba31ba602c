//! Configuration file loading for agent-debate
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. See [`ConfigLoader::load`] for the priority order.

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, FileConfig, FileDebateConfig, FileModelsConfig, FileOutputConfig,
    FileParticipantConfig, FileProviderConfig, ProviderKind,
};
pub use loader::ConfigLoader;
