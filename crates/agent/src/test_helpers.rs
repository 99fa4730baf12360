//! Shared fakes for agent tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use truthlens_core::article::{Article, RawArticle, VerifiedArticle};
use truthlens_core::error::{ProviderError, RetrievalError};
use truthlens_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use truthlens_core::stage::NewsProvider;

/// One scripted outcome of a provider call.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Fail(ProviderError),
    /// Never resolves; only the caller's timeout ends the call.
    Hang,
    Panic,
}

/// An LLM provider that plays back a script, one step per call.
///
/// Panics if called more often than the script allows.
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Reply(text)) => Ok(CompletionResponse {
                text,
                model: request.model,
                usage: Some(Usage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                    total_tokens: 150,
                }),
            }),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Panic) => panic!("scripted provider panic"),
            None => panic!("ScriptedProvider: script exhausted"),
        }
    }
}

/// A news provider returning a fixed outcome and counting calls.
pub struct StaticNews {
    outcome: Result<Vec<RawArticle>, RetrievalError>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl StaticNews {
    pub fn ok(records: Vec<RawArticle>) -> Self {
        Self {
            outcome: Ok(records),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: RetrievalError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(query, limit)` pairs seen so far.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsProvider for StaticNews {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawArticle>, RetrievalError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        self.outcome.clone()
    }
}

pub fn raw(url: &str, title: &str) -> RawArticle {
    RawArticle {
        url: Some(url.into()),
        title: Some(title.into()),
        content: Some(format!("Body of {title}")),
        source: Some(serde_json::json!({"id": null, "name": "Example News"})),
        ..RawArticle::default()
    }
}

pub fn article(n: usize) -> Article {
    Article::new(
        format!("https://example.com/{n}"),
        format!("Headline {n}"),
        format!("Body {n}"),
        "Example News",
    )
}

pub fn verified(n: usize) -> Vec<VerifiedArticle> {
    (0..n).map(|i| VerifiedArticle::unverified(article(i))).collect()
}

pub const DEBATE_JSON: &str =
    r#"{"statement":"Carbon pricing cuts emissions","for":["Cheaper than regulation"],"against":["Regressive for households"]}"#;
