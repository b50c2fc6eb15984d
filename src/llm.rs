use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::prompt::{build_prompt, Category};

/// Persona fixed for every completion request.
const SYSTEM_PROMPT: &str =
    "You are a professional editor creating high-quality, family-friendly content.";

/// Per-attempt timeout on the completion call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Completion attempts per article before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Advisory target length for rewritten articles, in words.
const WORD_COUNT_RANGE: std::ops::RangeInclusive<usize> = 600..=800;

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// One attempt against a chat-completion endpoint.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Talks to an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        OpenAiClient {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
        }
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                Message {
                    role: "user".into(),
                    content: prompt.into(),
                },
            ],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmError(e.to_string()))?;

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::LlmError(e.to_string()))?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))?
            .to_string();

        Ok(reply)
    }
}

/// Rewrites extracted article text for a category, or gives up after the
/// retry budget is spent.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str, category: Category) -> Option<String>;
}

/// Wraps a completion client with bounded retries: up to three attempts,
/// exponential backoff starting at one base unit, plus up to half a unit
/// of random jitter before each retry.
pub struct RetryingRewriter<C> {
    api: C,
    base_delay: Duration,
}

impl<C> RetryingRewriter<C> {
    pub fn new(api: C) -> Self {
        RetryingRewriter {
            api,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Same policy with a different time unit; tests run on milliseconds.
    pub fn with_base_delay(api: C, base_delay: Duration) -> Self {
        RetryingRewriter { api, base_delay }
    }
}

#[async_trait]
impl<C: CompletionApi> Rewriter for RetryingRewriter<C> {
    async fn rewrite(&self, text: &str, category: Category) -> Option<String> {
        let prompt = build_prompt(text, category);
        let mut backoff = self.base_delay;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.api.complete(&prompt).await {
                Ok(content) => {
                    let content = content.trim().to_string();
                    let word_count = content.split_whitespace().count();
                    if !WORD_COUNT_RANGE.contains(&word_count) {
                        // Out-of-band length is logged but still accepted
                        warn!(word_count, "Rewritten article outside the 600-800 word target");
                    }
                    return Some(content);
                }
                Err(e) => {
                    error!(attempt, "Completion attempt failed: {}", e);
                    if attempt < MAX_ATTEMPTS {
                        let jitter =
                            self.base_delay.mul_f64(rand::thread_rng().gen_range(0.0..0.5));
                        tokio::time::sleep(backoff + jitter).await;
                        backoff *= 2;
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails a configured number of times, then succeeds with a fixed reply.
    struct FlakyApi {
        failures: u32,
        reply: String,
        calls: AtomicU32,
    }

    impl FlakyApi {
        fn new(failures: u32, reply: &str) -> Self {
            FlakyApi {
                failures,
                reply: reply.to_string(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionApi for FlakyApi {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(AppError::LlmError(format!("simulated failure {}", call)))
            } else {
                Ok(self.reply.clone())
            }
        }
    }

    fn fast_rewriter(api: FlakyApi) -> RetryingRewriter<FlakyApi> {
        RetryingRewriter::with_base_delay(api, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn returns_first_success_trimmed() {
        let rewriter = fast_rewriter(FlakyApi::new(0, "  rewritten text  "));
        let result = rewriter.rewrite("input", Category::General).await;
        assert_eq!(result.as_deref(), Some("rewritten text"));
        assert_eq!(rewriter.api.calls(), 1);
    }

    #[tokio::test]
    async fn success_on_the_third_attempt_counts() {
        let rewriter = fast_rewriter(FlakyApi::new(2, "third time lucky"));
        let result = rewriter.rewrite("input", Category::Food).await;
        assert_eq!(result.as_deref(), Some("third time lucky"));
        assert_eq!(rewriter.api.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_three_attempts() {
        let rewriter = fast_rewriter(FlakyApi::new(u32::MAX, "never"));
        let result = rewriter.rewrite("input", Category::Travel).await;
        assert!(result.is_none());
        assert_eq!(rewriter.api.calls(), 3);
    }

    #[tokio::test]
    async fn short_output_is_accepted_with_a_warning() {
        // Word-count enforcement is advisory; a short reply still succeeds
        let rewriter = fast_rewriter(FlakyApi::new(0, "way too short"));
        let result = rewriter.rewrite("input", Category::Finance).await;
        assert_eq!(result.as_deref(), Some("way too short"));
    }
}
