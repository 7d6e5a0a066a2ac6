//! OpenAI-compatible chat completions provider.
//!
//! Works against api.openai.com or any server speaking the same
//! `/v1/chat/completions` protocol.

use super::{
    factory::ProviderFactory,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions provider.
///
/// Holds one `reqwest::Client` for its whole lifetime; build it once at
/// startup and share it through an `Arc`.
pub struct OpenAiProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let credential =
            ApiCredential::new(api_key, CredentialSource::Programmatic, "OpenAI API key");
        Self::with_credential(credential, DEFAULT_BASE_URL)
    }

    /// Build from JSON settings: `api_key` (falls back to `OPENAI_API_KEY`)
    /// and an optional `base_url`.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            OPENAI_API_KEY_ENV,
            "OpenAI API key",
        )?;
        let base_url = config["base_url"].as_str().unwrap_or(DEFAULT_BASE_URL);
        Self::with_credential(credential, base_url)
    }

    fn with_credential(credential: ApiCredential, base_url: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            credential,
            base_url: base_url.to_string(),
            client,
        })
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
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
    choices: Vec<Choice>,
    model: String,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    // null when the model refuses or calls a tool
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthError);
        }

        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| ProviderError::HttpError(e.to_string()))?;
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ProviderError::ParseError("response has no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: body.model,
        })
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for [`OpenAiProvider`].
///
/// ```json
/// { "api_key": "sk-...", "base_url": "https://api.openai.com/v1" }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(OpenAiProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiCredential::is_available(config, "api_key", OPENAI_API_KEY_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "OpenAI API key required: set 'api_key' in config or {} env",
                OPENAI_API_KEY_ENV
            )));
        }

        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution() {
        let provider = OpenAiProvider::new("key").unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );

        let local = serde_json::json!({ "api_key": "key", "base_url": "http://localhost:1234/" });
        let provider = OpenAiProvider::from_config(&local).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:1234/v1/chat/completions");

        let proxy = serde_json::json!({
            "api_key": "key",
            "base_url": "http://proxy/custom/chat/completions"
        });
        let provider = OpenAiProvider::from_config(&proxy).unwrap();
        assert_eq!(provider.endpoint(), "http://proxy/custom/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("시스템"), ChatMessage::user("본문")];
        let request = ChatRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: 0.0,
            max_tokens: 1000,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "본문");
    }

    #[test]
    fn test_response_with_null_content_parses() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"model":"gpt-4","choices":[{"message":{"content":null},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert!(body.choices[0].message.content.is_none());
        assert!(body.usage.is_none());
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret = "sk-proj-super-secret-key-12345";
        let provider = OpenAiProvider::new(secret).unwrap();

        let debug_output = format!("{:?}", provider);
        assert!(!debug_output.contains(secret));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_health_check_requires_key() {
        assert!(OpenAiProvider::new("key").unwrap().health_check().await);
        assert!(!OpenAiProvider::new("").unwrap().health_check().await);
    }

    #[test]
    fn test_from_config_tracks_source() {
        let config = serde_json::json!({
            "api_key": "config-api-key",
            "base_url": "https://llm.internal/v1"
        });

        let provider = OpenAiProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url, "https://llm.internal/v1");
        assert_eq!(provider.credential.source(), CredentialSource::Config);
    }

    #[test]
    fn test_factory_rejects_bad_base_url() {
        let config = serde_json::json!({ "api_key": "k", "base_url": "ftp://nope" });
        assert!(OpenAiProviderFactory.validate_config(&config).is_err());
    }

    #[test]
    fn test_factory_create_with_api_key() {
        let provider = OpenAiProviderFactory
            .create(&serde_json::json!({ "api_key": "test-api-key" }))
            .unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
