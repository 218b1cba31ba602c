//! OpenAI-compatible chat completions backend

use async_trait::async_trait;
use debate_application::{GenerationBackend, GenerationRequest};
use debate_domain::GenerationError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently failed requests are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), doubling each time
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Backend speaking the `/chat/completions` protocol
///
/// Works against OpenAI itself and compatible servers (DeepSeek, vLLM,
/// Ollama's OpenAI endpoint) by changing `base_url`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
    retry: RetryPolicy,
}

impl OpenAiBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_tokens: 1000,
            temperature: 0.7,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn body<'a>(&self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &request.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let call = self.send(request);
        match request.deadline {
            Some(deadline) => tokio::time::timeout(deadline, call)
                .await
                .map_err(|_| GenerationError::Timeout)?,
            None => call.await,
        }
    }

    async fn send(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &request.model, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::RequestFailed(format!("invalid response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse(request.model.clone()))
    }
}

fn transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::ConnectionError(error.to_string())
    }
}

/// Rate limits and server errors are worth retrying; anything else is final
fn status_error(status: StatusCode, model: &str, body: &str) -> GenerationError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        GenerationError::ConnectionError(detail)
    } else if status == StatusCode::NOT_FOUND {
        GenerationError::ModelNotAvailable(model.to_string())
    } else {
        GenerationError::RequestFailed(detail)
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let mut attempt = 0;
        loop {
            match self.attempt(&request).await {
                Ok(text) => {
                    debug!(model = %request.model, attempt, "Generation succeeded");
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        model = %request.model,
                        "Generation failed ({}), retrying in {:?} ({}/{})",
                        e,
                        delay,
                        attempt + 1,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per connection, in order
    async fn serve(responses: Vec<(u16, String)>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let reply = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if data.len() >= split + 4 + length {
                    return text[split + 4..].to_string();
                }
            }
            if n == 0 {
                return text;
            }
        }
    }

    fn completion(content: &str) -> String {
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
            .to_string()
    }

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_retry_delay_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_status_classification() {
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "m", "").is_transient());
        assert!(status_error(StatusCode::BAD_GATEWAY, "m", "").is_transient());
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "gpt-x", ""),
            GenerationError::ModelNotAvailable(m) if m == "gpt-x"
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "m", "bad key"),
            GenerationError::RequestFailed(d) if d == "HTTP 401: bad key"
        ));
    }

    #[test]
    fn test_body_omits_missing_system_prompt() {
        let backend = OpenAiBackend::new("http://localhost/v1/", "k").with_sampling(64, 0.0);
        assert_eq!(backend.endpoint(), "http://localhost/v1/chat/completions");

        let request = GenerationRequest::new("m", "hello");
        let body = serde_json::to_value(backend.body(&request)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 64);

        let request = request.with_system_prompt("be brief");
        let body = serde_json::to_value(backend.body(&request)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let (url, server) = serve(vec![(200, completion("Answer: 4"))]).await;
        let backend = OpenAiBackend::new(url, "sk-test").with_retry(fast_retry(0));

        let text = backend
            .generate(GenerationRequest::new("gpt-4o-mini", "2 + 2?").with_system_prompt("math"))
            .await
            .unwrap();
        assert_eq!(text, "Answer: 4");

        let requests = server.await.unwrap();
        let sent: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
        assert_eq!(sent["model"], "gpt-4o-mini");
        assert_eq!(sent["messages"][1]["content"], "2 + 2?");
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let (url, server) = serve(vec![
            (503, "overloaded".to_string()),
            (429, "slow down".to_string()),
            (200, completion("Answer: 7")),
        ])
        .await;
        let backend = OpenAiBackend::new(url, "sk-test").with_retry(fast_retry(2));

        let text = backend.generate(GenerationRequest::new("m", "q")).await.unwrap();
        assert_eq!(text, "Answer: 7");
        assert_eq!(server.await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (url, server) = serve(vec![(400, "bad request".to_string())]).await;
        let backend = OpenAiBackend::new(url, "sk-test").with_retry(fast_retry(3));

        let result = backend.generate(GenerationRequest::new("m", "q")).await;
        assert!(matches!(result, Err(GenerationError::RequestFailed(_))));
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_completion_is_empty_response() {
        let (url, _server) = serve(vec![(200, completion("   "))]).await;
        let backend = OpenAiBackend::new(url, "sk-test").with_retry(fast_retry(0));

        let result = backend.generate(GenerationRequest::new("m", "q")).await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse(m)) if m == "m"));
    }

    #[tokio::test]
    async fn test_deadline_bounds_each_attempt() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let backend = OpenAiBackend::new(url, "sk-test").with_retry(fast_retry(0));
        let result = backend
            .generate(GenerationRequest::new("m", "q").with_deadline(Some(Duration::from_millis(50))))
            .await;
        assert!(matches!(result, Err(GenerationError::Timeout)));
    }
}
