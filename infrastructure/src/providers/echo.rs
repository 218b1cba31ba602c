//! Offline backend for dry runs

use async_trait::async_trait;
use debate_application::{GenerationBackend, GenerationRequest};
use debate_domain::GenerationError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic backend that never leaves the process
///
/// Each reply quotes the first non-empty line of the prompt and ends with
/// a fixed `Answer:` line, so tally arbitration always reaches consensus.
pub struct EchoBackend {
    answer: String,
    calls: AtomicUsize,
}

impl EchoBackend {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for EchoBackend {
    fn default() -> Self {
        Self::new("echo")
    }
}

#[async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        let opening = request
            .prompt
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("(empty prompt)");

        Ok(format!(
            "[{} #{}] {}\nAnswer: {}",
            request.model, call, opening, self.answer
        ))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::extract_answer;

    #[tokio::test]
    async fn test_echo_is_deterministic() {
        let backend = EchoBackend::new("4");
        let first = backend
            .generate(GenerationRequest::new("m", "\n  What is 2 + 2?\nThink."))
            .await
            .unwrap();
        assert_eq!(first, "[m #1] What is 2 + 2?\nAnswer: 4");
        assert_eq!(extract_answer(&first).as_deref(), Some("4"));

        let second = backend.generate(GenerationRequest::new("m", "")).await.unwrap();
        assert_eq!(second, "[m #2] (empty prompt)\nAnswer: 4");
        assert_eq!(backend.calls(), 2);
    }
}
