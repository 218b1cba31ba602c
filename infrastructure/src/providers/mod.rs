//! Generation backends implementing the
//! [`GenerationBackend`](debate_application::GenerationBackend) port.

mod echo;
mod openai;

pub use echo::EchoBackend;
pub use openai::{OpenAiBackend, RetryPolicy};

use crate::config::{ConfigError, FileProviderConfig, ProviderKind};
use debate_application::GenerationBackend;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the backend selected by `[provider] kind`
pub fn build_backend(
    config: &FileProviderConfig,
) -> Result<Arc<dyn GenerationBackend>, ConfigError> {
    let backend: Arc<dyn GenerationBackend> = match config.kind {
        ProviderKind::Echo => Arc::new(EchoBackend::default()),
        ProviderKind::OpenAi => {
            let api_key = config.resolve_api_key()?;
            Arc::new(
                OpenAiBackend::new(config.base_url.as_str(), api_key)
                    .with_sampling(config.max_tokens, config.temperature)
                    .with_retry(RetryPolicy {
                        max_retries: config.max_retries,
                        backoff: Duration::from_millis(config.retry_backoff_ms),
                    }),
            )
        }
    };
    info!("Using {} generation backend", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_echo_needs_no_key() {
        let config = FileProviderConfig {
            kind: ProviderKind::Echo,
            api_key_env: "AGENT_DEBATE_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "echo");
    }

    #[test]
    fn test_build_openai_requires_key() {
        let config = FileProviderConfig {
            api_key_env: "AGENT_DEBATE_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_backend(&config),
            Err(ConfigError::MissingApiKey(_))
        ));

        let config = FileProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..config
        };
        assert_eq!(build_backend(&config).unwrap().name(), "openai");
    }
}
