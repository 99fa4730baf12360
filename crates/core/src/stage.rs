//! Pipeline stage traits.
//!
//! Each stage of the query pipeline is a small capability trait. The
//! orchestrator holds one `Arc<dyn _>` per stage and never knows whether it
//! talks to a network-backed adapter or a deterministic mock.
//!
//! ```text
//! Query ─▶ Retriever ─▶ Verifier ─▶ Summarizer ─▶ QueryResult
//! ```

use async_trait::async_trait;

use crate::article::{Article, RawArticle, VerifiedArticle};
use crate::error::RetrievalError;
use crate::query::Query;
use crate::summary::Summary;

/// A news search backend returning un-normalized records.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Search for `query`, asking for at most `limit` records.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawArticle>, RetrievalError>;
}

/// Retrieval stage: query text in, canonical articles out.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, RetrievalError>;
}

/// Verification stage: assigns a verdict to every article.
///
/// Must be order-preserving and one-to-one. Has no error path.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, articles: Vec<Article>) -> Vec<VerifiedArticle>;
}

/// Summarization stage: always produces a summary.
///
/// Implementations absorb their own failures and fall back to a
/// deterministic summary instead of returning an error.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, query: &Query, articles: &[VerifiedArticle]) -> Summary;
}
