//! OpenAI-compatible chat completions
//!
//! Talks to `{api_base}/chat/completions` with bearer auth. Anything that
//! speaks the same protocol (vLLM, llama.cpp server, LM Studio, Azure
//! deployments) works by changing `api_base`.
//!
//! ```no_run
//! use report_llm::{CompletionRequest, LLMProvider, Message};
//! use report_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::with_config(OpenAIConfig::from_env()?)?;
//!
//!     let request = CompletionRequest::new(
//!         "gpt-4o-mini",
//!         vec![
//!             Message::system("You are a trading guru."),
//!             Message::user("TSLA closed at 202.11"),
//!         ],
//!     )
//!     .with_temperature(1.1);
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.text());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Default: `https://api.openai.com/v1`
    pub api_base: String,
    /// Whole-request timeout (default: 120)
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: OPENAI_API_BASE.to_string(),
            timeout_secs: TIMEOUT_SECS,
        }
    }

    /// `OPENAI_API_KEY` (required) and `OPENAI_API_BASE` (optional)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .ok_or_else(|| LLMError::Config("OPENAI_API_KEY environment variable not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = lookup("OPENAI_API_BASE") {
            config.api_base = api_base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::from_status(status.as_u16(), body, &request.model));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::MalformedResponse(e.to_string()))?;

        // n = 1, so only the first choice exists
        let choice = chat.choices.into_iter().next().ok_or(LLMError::EmptyCompletion)?;
        let usage = chat.usage.unwrap_or_default();
        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("none"),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completion received"
        );
        // refusals come back as `content: null`
        let content = choice.message.content.ok_or(LLMError::EmptyCompletion)?;

        Ok(CompletionResponse {
            message: Message::assistant(content),
            stop_reason: map_stop_reason(choice.finish_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    // omitted by some compatible servers
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Default, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        Some("stop") | None => StopReason::EndTurn,
        Some(other) => {
            debug!(reason = other, "unrecognized finish_reason");
            StopReason::EndTurn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        let config = OpenAIConfig::new("test-key").with_api_base(server.url("/v1"));
        OpenAIProvider::with_config(config).unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.config().api_key, "test-key");
        assert_eq!(provider.config().api_base, "https://api.openai.com/v1");
        assert_eq!(provider.config().timeout_secs, 120);
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let config = OpenAIConfig::new("k").with_api_base("http://localhost:8000/v1/");
        let provider = OpenAIProvider::with_config(config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = OpenAIConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("key-from-env".to_string()),
            "OPENAI_API_BASE" => Some("http://localhost:1234/v1".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key, "key-from-env");
        assert_eq!(config.api_base, "http://localhost:1234/v1");

        assert!(matches!(
            OpenAIConfig::from_lookup(|_| None),
            Err(LLMError::Config(_))
        ));
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(
            map_stop_reason(Some("content_filter")),
            StopReason::ContentFilter
        );
        assert_eq!(map_stop_reason(Some("unknown")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(None), StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_complete_sends_messages_and_parses_choice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .json_body(json!({
                        "model": "gpt-4o-mini",
                        "messages": [
                            {"role": "system", "content": "You are a trading guru."},
                            {"role": "user", "content": "AB"}
                        ],
                        "temperature": 1.5,
                        "stream": false
                    }));
                then.status(200).json_body(json!({
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "Buy TSLA."},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
                }));
            })
            .await;

        let request = CompletionRequest::new(
            "gpt-4o-mini",
            vec![Message::system("You are a trading guru."), Message::user("AB")],
        )
        .with_temperature(1.5);

        let response = provider_for(&server).complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.message, Message::assistant("Buy TSLA."));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 15);
    }

    #[tokio::test]
    async fn test_complete_without_usage() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "Hold."}}]
                }));
            })
            .await;

        let request = CompletionRequest::new("local-model", vec![Message::user("x")]);
        let response = provider_for(&server).complete(request).await.unwrap();

        assert_eq!(response.message.text(), "Hold.");
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(401).body("bad key");
            })
            .await;

        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("x")]);
        let result = provider_for(&server).complete(request).await;

        assert!(matches!(result, Err(LLMError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_unexpected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("x")]);
        let result = provider_for(&server).complete(request).await;

        assert!(matches!(result, Err(LLMError::EmptyCompletion)));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_completion() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": null,
                            "refusal": "I can't help with that."
                        },
                        "finish_reason": "stop"
                    }]
                }));
            })
            .await;

        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("x")]);
        let result = provider_for(&server).complete(request).await;

        assert!(matches!(result, Err(LLMError::EmptyCompletion)));
    }
}
