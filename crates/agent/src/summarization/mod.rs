//! The Summarization agent.
//!
//! [`LlmSummarizer`] turns retrieved articles into a debate summary through
//! an unreliable LLM. Every path ends in a [`Summary`]: the run is an
//! explicit state machine whose only terminal states are a parsed model
//! answer or the deterministic mock.
//!
//! ```text
//! PromptBuild ─▶ LlmCall ─▶ ParseResponse ─▶ Done
//!      │           │  ▲           │
//!      │           ▼  │           │
//!      │         Backoff          │
//!      └──────────▶ MockFallback ◀┘
//! ```
//!
//! Whether the LLM path is used at all is decided when the pipeline is
//! built: with real summarization off, [`MockSummarizer`] is wired instead.

pub mod mock;
pub mod parse;
pub mod prompt;

pub use mock::{MockSummarizer, mock_summary};
pub use parse::parse_debate;
pub use prompt::{PromptSettings, build_debate_prompt};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use truthlens_config::SummarizationConfig;
use truthlens_core::article::VerifiedArticle;
use truthlens_core::error::SummarizeError;
use truthlens_core::provider::{CompletionRequest, CompletionResponse, Provider};
use truthlens_core::query::Query;
use truthlens_core::stage::Summarizer;
use truthlens_core::summary::Summary;

use crate::retry::{RetryDecision, RetryPolicy};

/// States of one summarization run.
#[derive(Debug)]
enum Stage {
    PromptBuild,
    LlmCall { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    ParseResponse { text: String },
    MockFallback { reason: SummarizeError },
    Done(Summary),
}

/// LLM-backed summarizer with bounded retries and a mock fallback.
pub struct LlmSummarizer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    call_timeout: Duration,
    retry: RetryPolicy,
    prompt: PromptSettings,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_output_tokens: Some(1500),
            call_timeout: Duration::from_secs(12),
            retry: RetryPolicy::default(),
            prompt: PromptSettings::default(),
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &SummarizationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: Some(config.max_output_tokens),
            call_timeout: config.timeout(),
            retry: RetryPolicy::from_config(config),
            prompt: PromptSettings::from_config(config),
            ..Self::new(provider, &config.model)
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_prompt_settings(mut self, prompt: PromptSettings) -> Self {
        self.prompt = prompt;
        self
    }

    /// Drive the state machine to a summary.
    pub async fn run(&self, query: &Query, articles: &[VerifiedArticle]) -> Summary {
        let mut prompt = String::new();
        let mut stage = Stage::PromptBuild;

        loop {
            stage = match stage {
                Stage::PromptBuild => match build_debate_prompt(query, articles, &self.prompt) {
                    Ok(built) => {
                        debug!(chars = built.len(), "Debate prompt built");
                        prompt = built;
                        Stage::LlmCall { attempt: 1 }
                    }
                    Err(reason) => Stage::MockFallback { reason },
                },

                Stage::LlmCall { attempt } => match self.call_once(&prompt).await {
                    Ok(response) => {
                        info!(
                            provider = %self.provider.name(),
                            model = %response.model,
                            attempt,
                            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
                            "LLM call succeeded"
                        );
                        Stage::ParseResponse {
                            text: response.text,
                        }
                    }
                    Err(err) => match self.retry.decide(attempt, &err) {
                        RetryDecision::Retry { delay } => {
                            warn!(
                                provider = %self.provider.name(),
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "LLM call failed, retrying"
                            );
                            Stage::Backoff { attempt, delay }
                        }
                        RetryDecision::GiveUp => Stage::MockFallback { reason: err },
                    },
                },

                Stage::Backoff { attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    Stage::LlmCall {
                        attempt: attempt + 1,
                    }
                }

                Stage::ParseResponse { text } => match parse_debate(&text, query) {
                    Ok(summary) => Stage::Done(summary),
                    Err(reason) => Stage::MockFallback { reason },
                },

                Stage::MockFallback { reason } => {
                    log_fallback(&reason);
                    Stage::Done(mock_summary(query, articles))
                }

                Stage::Done(summary) => return summary,
            };
        }
    }

    /// One provider call, isolated in its own task and bounded by the
    /// per-call timeout. A panicking provider surfaces as `Unexpected`.
    async fn call_once(&self, prompt: &str) -> Result<CompletionResponse, SummarizeError> {
        let mut request = CompletionRequest::new(&self.model, prompt);
        request.temperature = self.temperature;
        request.max_tokens = self.max_output_tokens;
        request.json_output = true;

        let provider = Arc::clone(&self.provider);
        let mut handle = tokio::spawn(async move { provider.complete(request).await });

        match tokio::time::timeout(self.call_timeout, &mut handle).await {
            Ok(Ok(Ok(response))) => Ok(response),
            Ok(Ok(Err(err))) => Err(err.into()),
            Ok(Err(join_err)) => Err(SummarizeError::Unexpected(join_err.to_string())),
            Err(_) => {
                handle.abort();
                Err(SummarizeError::Transient(format!(
                    "no response within {}s",
                    self.call_timeout.as_secs_f32()
                )))
            }
        }
    }
}

fn log_fallback(reason: &SummarizeError) {
    match reason {
        SummarizeError::Auth(_) | SummarizeError::Config(_) | SummarizeError::Unexpected(_) => {
            error!(kind = reason.kind(), error = %reason, "Summarization falling back to mock")
        }
        SummarizeError::Transient(_) | SummarizeError::Policy(_) | SummarizeError::Parse(_) => {
            warn!(kind = reason.kind(), error = %reason, "Summarization falling back to mock")
        }
        SummarizeError::Prompt(_) => {
            debug!(kind = reason.kind(), error = %reason, "Summarization falling back to mock")
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, query: &Query, articles: &[VerifiedArticle]) -> Summary {
        self.run(query, articles).await
    }
}
