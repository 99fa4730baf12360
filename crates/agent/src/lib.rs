//! The TruthLens query pipeline.
//!
//! One query flows through three stateless agents:
//!
//! 1. **Retrieve** candidate articles from the news provider
//! 2. **Verify** each article's provenance
//! 3. **Summarize** them as a debate through the LLM, falling back to a
//!    deterministic mock on any unrecoverable failure
//!
//! The [`Orchestrator`] sequences the stages and guarantees a valid
//! [`QueryResult`](truthlens_core::QueryResult) for every valid query.
//! [`build_from_config`] picks the real or mock adapter for each stage.

pub mod orchestrator;
pub mod pipeline;
pub mod retrieval;
pub mod retry;
pub mod summarization;
pub mod verification;

#[cfg(test)]
mod test_helpers;

pub use orchestrator::Orchestrator;
pub use pipeline::build_from_config;
pub use retrieval::RetrievalAgent;
pub use retry::{RetryDecision, RetryPolicy};
pub use summarization::{LlmSummarizer, MockSummarizer, mock_summary};
pub use verification::{PolicyVerifier, ProvenanceVerifier};
