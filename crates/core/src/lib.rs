//! # TruthLens Core
//!
//! Domain types, stage traits, and error definitions for the TruthLens
//! news pipeline. This crate has **no HTTP or runtime dependencies**: it
//! defines the contract that the retrieval, verification and summarization
//! stages are implemented against.
//!
//! ## Design Philosophy
//!
//! Every pipeline stage is a trait here. Real (network-backed) and mock
//! adapters live in their respective crates, and the adapter for each stage
//! is chosen once when the pipeline is built. This enables:
//! - Swapping implementations via feature flags
//! - Testing the orchestrator with scripted fakes
//! - A clean dependency graph (all crates depend inward on core)

pub mod article;
pub mod error;
pub mod provider;
pub mod query;
pub mod stage;
pub mod summary;

// Re-export key types at crate root for ergonomics
pub use article::{Article, RawArticle, VerifiedArticle};
pub use error::{Error, ProviderError, Result, RetrievalError, SummarizeError, ValidationError};
pub use provider::{CompletionRequest, CompletionResponse, Provider, Usage};
pub use query::{MAX_QUERY_CHARS, Query};
pub use stage::{NewsProvider, Retriever, Summarizer, Verifier};
pub use summary::{DEBATE_FORMAT, QueryResult, Summary};
