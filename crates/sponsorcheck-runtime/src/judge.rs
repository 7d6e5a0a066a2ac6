//! Condition judge: decides which free-text conditions a post satisfies.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use sponsorcheck_core::{parse_judge_response, JudgeOutcome};

use crate::config::JudgeConfig;
use crate::prompts::JudgePrompt;
use crate::providers::{CompletionConfig, LlmProvider, ProviderError};

/// Errors from a condition judge.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("LLM call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("No parseable verdicts for {expected} conditions")]
    NoVerdicts { expected: usize },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Judges a post's text against a list of conditions.
///
/// # Contract
/// - One invocation per request; implementations keep no per-request state
/// - Returned details are in the order the judge reported them, which need
///   not match the input order
#[async_trait]
pub trait ConditionJudge: Send + Sync {
    async fn judge(&self, content: &str, conditions: &[String]) -> Result<JudgeOutcome, JudgeError>;

    /// Whether the judge's backend looks usable.
    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Judge backed by a single chat completion.
pub struct LlmJudge {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    config: JudgeConfig,
}

impl LlmJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
            config: JudgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: JudgeConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl ConditionJudge for LlmJudge {
    async fn judge(&self, content: &str, conditions: &[String]) -> Result<JudgeOutcome, JudgeError> {
        if conditions.is_empty() {
            debug!("no conditions to judge, skipping model call");
            return Ok(JudgeOutcome::vacuous());
        }

        let messages = JudgePrompt::new(conditions, content)
            .with_format(self.config.response_format)
            .messages();

        let response = self.provider.complete(messages, &self.completion).await?;
        info!(
            provider = self.provider.name(),
            model = %response.model,
            tokens = response.usage.total(),
            "judge response received"
        );

        let outcome = parse_judge_response(&response.content);

        if outcome.is_vacuous() {
            if self.config.reject_empty_verdicts {
                return Err(JudgeError::NoVerdicts {
                    expected: conditions.len(),
                });
            }
            warn!(
                expected = conditions.len(),
                "judge response had no verdicts, condition check passes vacuously"
            );
        } else if outcome.details.len() != conditions.len() {
            warn!(
                expected = conditions.len(),
                parsed = outcome.details.len(),
                "verdict count differs from condition count"
            );
        }

        Ok(outcome)
    }

    async fn health_check(&self) -> bool {
        self.provider.health_check().await
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseFormat;
    use crate::providers::{ChatMessage, CompletionResponse, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<String, u16>,
        calls: AtomicUsize,
        last_messages: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    usage: TokenUsage::default(),
                    model: config.model.clone(),
                }),
                Err(status) => Err(ProviderError::ApiError {
                    status: *status,
                    message: "upstream failure".to_string(),
                }),
            }
        }

        async fn health_check(&self) -> bool {
            self.reply.is_ok()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn conditions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_mixed_verdicts() {
        let provider = ScriptedProvider::replying(
            "조건: 정직한 리뷰 작성 → Yes\n조건: 가격 명시 → No",
        );
        let judge = LlmJudge::new(provider.clone(), CompletionConfig::default());

        let outcome = judge
            .judge("본문", &conditions(&["정직한 리뷰 작성", "가격 명시"]))
            .await
            .unwrap();

        assert!(!outcome.all_passed);
        assert_eq!(outcome.details.len(), 2);
        assert_eq!(outcome.details[0].condition_text, "정직한 리뷰 작성");
        assert_eq!(outcome.details[1].result, "No");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_conditions_skip_model() {
        let provider = ScriptedProvider::replying("anything");
        let judge = LlmJudge::new(provider.clone(), CompletionConfig::default());

        let outcome = judge.judge("본문", &[]).await.unwrap();

        assert!(outcome.all_passed);
        assert!(outcome.details.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_passes_vacuously_by_default() {
        let provider = ScriptedProvider::replying("I cannot determine this.");
        let judge = LlmJudge::new(provider, CompletionConfig::default());

        let outcome = judge.judge("본문", &conditions(&["가격 명시"])).await.unwrap();

        assert!(outcome.all_passed);
        assert!(outcome.details.is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_empty_verdicts() {
        let provider = ScriptedProvider::replying("I cannot determine this.");
        let judge = LlmJudge::new(provider, CompletionConfig::default()).with_config(JudgeConfig {
            reject_empty_verdicts: true,
            ..JudgeConfig::default()
        });

        let result = judge.judge("본문", &conditions(&["가격 명시"])).await;
        assert!(matches!(result, Err(JudgeError::NoVerdicts { expected: 1 })));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let judge = LlmJudge::new(ScriptedProvider::failing(500), CompletionConfig::default());

        let result = judge.judge("본문", &conditions(&["가격 명시"])).await;
        assert!(matches!(
            result,
            Err(JudgeError::Provider(ProviderError::ApiError { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_json_format_is_requested_and_parsed() {
        let provider = ScriptedProvider::replying(
            "```json\n[{\"condition\": \"가격 명시\", \"result\": \"YES\"}]\n```",
        );
        let judge = LlmJudge::new(provider.clone(), CompletionConfig::default()).with_config(
            JudgeConfig {
                response_format: ResponseFormat::Json,
                ..JudgeConfig::default()
            },
        );

        let outcome = judge.judge("본문", &conditions(&["가격 명시"])).await.unwrap();

        assert!(outcome.all_passed);
        assert_eq!(outcome.details[0].result, "YES");
        let sent = provider.last_messages.lock().unwrap();
        assert!(sent[1].content.contains("JSON"));
    }

    #[tokio::test]
    async fn test_health_check_delegates_to_provider() {
        let healthy = LlmJudge::new(ScriptedProvider::replying("x"), CompletionConfig::default());
        let broken = LlmJudge::new(ScriptedProvider::failing(401), CompletionConfig::default());

        assert!(healthy.health_check().await);
        assert!(!broken.health_check().await);
    }
}
