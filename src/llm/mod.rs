//! Text-generation client used by triage and translation.
//!
//! The trait is object-safe so the service can hold an
//! `Arc<dyn LlmClient>` and swap in [`MockLlmClient`] under test.

mod gemini;

pub use gemini::{GeminiClient, DEFAULT_BASE_URL};

use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("AI service is not configured (no API key)")]
    NotConfigured,

    #[error("Cannot reach AI service at {0}")]
    Connection(String),

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("AI service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI response could not be read: {0}")]
    ResponseParsing(String),

    #[error("AI response was empty")]
    EmptyResponse,

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub trait LlmClient: Send + Sync {
    /// Generate a completion for `prompt` under the `system` instruction.
    fn generate<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, LlmError>>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Mock client for tests: returns a canned response, an error, or answers late.
pub struct MockLlmClient {
    response: Result<String, String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails as if the network were down.
    pub fn failing() -> Self {
        Self {
            response: Err("mock".to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate<'a>(
        &'a self,
        _system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, LlmError>> {
        Box::pin(async move {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response
                .clone()
                .map_err(LlmError::Connection)
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_response() {
        let client = MockLlmClient::new("hello");
        assert_eq!(client.generate("sys", "prompt").await.unwrap(), "hello");
        assert_eq!(client.prompts(), vec!["prompt"]);
    }

    #[tokio::test]
    async fn failing_mock_reports_connection_error() {
        let client = MockLlmClient::failing();
        let err = client.generate("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Connection(_)));
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            LlmError::Timeout(20).to_string(),
            "AI request timed out after 20s"
        );
        assert_eq!(
            LlmError::Status { status: 429, body: "quota".into() }.to_string(),
            "AI service returned HTTP 429: quota"
        );
    }
}
