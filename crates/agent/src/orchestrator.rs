//! The query Orchestrator.
//!
//! Sequences Retrieval → Verification → Summarization for one query and is
//! the single place that decides what the caller gets back. `handle` never
//! fails: retrieval errors degrade to an empty article list and the
//! summarizer absorbs its own failures. One deadline covers the whole run.
//! A panic or overrun before verification finishes resolves to the minimal
//! degraded result. Once sources exist they are kept, and a panic or overrun
//! in summarization falls back to the mock summary of those sources.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Instrument, Span, debug, error, info, warn};
use truthlens_core::article::{Article, VerifiedArticle};
use truthlens_core::error::RetrievalError;
use truthlens_core::query::Query;
use truthlens_core::stage::{Retriever, Summarizer, Verifier};
use truthlens_core::summary::{QueryResult, Summary};

use crate::summarization::mock_summary;

/// Default hard deadline for a whole pipeline run.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(45);

#[derive(Clone)]
pub struct Orchestrator {
    retriever: Arc<dyn Retriever>,
    verifier: Arc<dyn Verifier>,
    summarizer: Arc<dyn Summarizer>,
    deadline: Duration,
    log_queries: bool,
}

impl Orchestrator {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        verifier: Arc<dyn Verifier>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            retriever,
            verifier,
            summarizer,
            deadline: DEFAULT_DEADLINE,
            log_queries: true,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Keep query text out of info-level logs.
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Answer one query. Always returns a structurally valid result.
    pub async fn handle(&self, query: Query) -> QueryResult {
        if self.log_queries {
            info!(query = %query, "Handling query");
        } else {
            info!(chars = query.text().chars().count(), "Handling query");
        }

        let started = Instant::now();
        let Some(sources) = self.gather(&query).await else {
            return Self::degraded(&query);
        };

        let remaining = self.deadline.saturating_sub(started.elapsed());
        let summary = self.summarize_within(&query, &sources, remaining).await;
        info!(sources = sources.len(), "Query answered");

        QueryResult { summary, sources }
    }

    /// Retrieval and Verification in their own task, bounded by the deadline.
    /// `None` when the task panicked or ran out of time.
    async fn gather(&self, query: &Query) -> Option<Vec<VerifiedArticle>> {
        let stages = self.clone();
        let task_query = query.clone();
        let mut task = tokio::spawn(
            async move { stages.retrieve_and_verify(&task_query).await }
                .instrument(Span::current()),
        );

        match tokio::time::timeout(self.deadline, &mut task).await {
            Ok(Ok(sources)) => Some(sources),
            Ok(Err(join_err)) => {
                error!(error = %join_err, "Retrieval task failed, returning degraded result");
                None
            }
            Err(_) => {
                task.abort();
                error!(
                    deadline_secs = self.deadline.as_secs(),
                    "Pipeline deadline exceeded during retrieval, returning degraded result"
                );
                None
            }
        }
    }

    async fn retrieve_and_verify(&self, query: &Query) -> Vec<VerifiedArticle> {
        let articles = self.retrieve(query).await;
        debug!(count = articles.len(), "Retrieval stage complete");

        let sources = self.verifier.verify(articles).await;
        debug!(
            verified = sources.iter().filter(|s| s.is_verified).count(),
            total = sources.len(),
            "Verification stage complete"
        );
        sources
    }

    /// Summarization in its own task with whatever is left of the deadline.
    /// A panic or overrun falls back to the mock summary of the same sources.
    async fn summarize_within(
        &self,
        query: &Query,
        sources: &[VerifiedArticle],
        budget: Duration,
    ) -> Summary {
        let summarizer = Arc::clone(&self.summarizer);
        let task_query = query.clone();
        let articles = sources.to_vec();
        let mut task = tokio::spawn(
            async move { summarizer.summarize(&task_query, &articles).await }
                .instrument(Span::current()),
        );

        match tokio::time::timeout(budget, &mut task).await {
            Ok(Ok(summary)) => summary,
            Ok(Err(join_err)) => {
                error!(error = %join_err, "Summarization task failed, using mock summary");
                mock_summary(query, sources)
            }
            Err(_) => {
                task.abort();
                warn!(
                    budget_ms = budget.as_millis() as u64,
                    "Pipeline deadline exceeded during summarization, using mock summary"
                );
                mock_summary(query, sources)
            }
        }
    }

    async fn retrieve(&self, query: &Query) -> Vec<Article> {
        match self.retriever.fetch(query).await {
            Ok(articles) => articles,
            Err(RetrievalError::Transient(reason)) => {
                warn!(reason = %reason, "Retrieval unavailable, continuing with no articles");
                Vec::new()
            }
            Err(RetrievalError::Config(reason)) => {
                debug!(reason = %reason, "Retrieval not configured, continuing with no articles");
                Vec::new()
            }
        }
    }

    /// The minimal valid result: no sources and the zero-article mock summary.
    pub fn degraded(query: &Query) -> QueryResult {
        QueryResult {
            summary: mock_summary(query, &[]),
            sources: Vec::new(),
        }
    }
}
