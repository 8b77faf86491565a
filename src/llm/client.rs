//! Chat-completion client for OpenAI-compatible providers

use crate::config::{ApiKey, Config};
use crate::error::{LitReviewError, Result};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Everything needed to talk to the provider. The key is injected here rather
/// than read from the environment so callers and tests control it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub api_key: ApiKey,
}

impl ClientConfig {
    pub fn from_config(config: &Config, api_key: ApiKey, model_override: Option<String>) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            model: model_override.unwrap_or_else(|| config.api.model.clone()),
            temperature: config.api.temperature,
            max_tokens: config.api.max_tokens,
            timeout: config.timeout(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Single-shot chat completion: one POST, no retries, no streaming
pub struct CompletionClient {
    http: Client,
    config: ClientConfig,
}

impl CompletionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LitReviewError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `messages` and return the text of the first choice
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let start_time = Instant::now();
        let url = self.config.endpoint();
        debug!("POST {} (model: {}, {} messages)", url, self.config.model, messages.len());

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LitReviewError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LitReviewError::EmptyResponse(format!("Undecodable completion body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LitReviewError::EmptyResponse("No content in completion response".to_string()))?;

        info!(
            "Completion received from {} in {}ms ({} chars)",
            self.config.model,
            start_time.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> ClientConfig {
        ClientConfig {
            base_url,
            model: "test/model".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout: Duration::from_secs(5),
            api_key: ApiKey::new("sk-test").unwrap(),
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_complete_sends_request_and_returns_first_choice() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "max_tokens": 4000,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("[1, 2]")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(test_config(mock_server.uri())).unwrap();
        let content = client.complete(&[ChatMessage::user("hello")]).await.unwrap();

        assert_eq!(content, "[1, 2]");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error_without_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(test_config(mock_server.uri())).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();

        match err {
            LitReviewError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // `expect(1)` is verified when the server drops
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(test_config(mock_server.uri())).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();

        assert!(matches!(err, LitReviewError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_content_is_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
            .mount(&mock_server)
            .await;

        let client = CompletionClient::new(test_config(mock_server.uri())).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();

        assert!(matches!(err, LitReviewError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Nothing listens on port 9 (discard) on the loopback interface in CI
        let client = CompletionClient::new(test_config("http://127.0.0.1:9".to_string())).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();

        assert!(matches!(err, LitReviewError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let mut config = test_config(mock_server.uri());
        config.timeout = Duration::from_millis(200);
        let client = CompletionClient::new(config).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();

        assert!(matches!(err, LitReviewError::Transport(_)));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let config = test_config("https://openrouter.ai/api/v1/".to_string());
        assert_eq!(config.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_model_override_takes_precedence() {
        let config = Config::default();
        let key = ApiKey::new("sk-x").unwrap();

        let default_model = ClientConfig::from_config(&config, key.clone(), None);
        let overridden = ClientConfig::from_config(&config, key, Some("anthropic/claude".to_string()));

        assert_eq!(default_model.model, config.api.model);
        assert_eq!(overridden.model, "anthropic/claude");
    }
}
