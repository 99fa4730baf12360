//! Pipeline construction.
//!
//! Feature flags are consulted here, once, to pick a real or mock adapter
//! for each stage. Nothing downstream branches on a flag.

use std::sync::Arc;
use tracing::{error, info};
use truthlens_config::AppConfig;
use truthlens_core::stage::{Summarizer, Verifier};
use truthlens_providers::{build_llm_from_config, build_news_from_config};

use crate::orchestrator::Orchestrator;
use crate::retrieval::RetrievalAgent;
use crate::summarization::{LlmSummarizer, MockSummarizer};
use crate::verification::{PolicyVerifier, ProvenanceVerifier};

/// Build the orchestrator described by `config`.
pub fn build_from_config(config: &AppConfig) -> Orchestrator {
    let flags = config.feature_flags();

    let news = build_news_from_config(config);
    let retriever = Arc::new(RetrievalAgent::new(news, config.retrieval.page_size));

    let policy = PolicyVerifier::new(&config.verification.trusted_domains);
    let verifier: Arc<dyn Verifier> = if flags.real_verification {
        Arc::new(ProvenanceVerifier::new(policy))
    } else {
        Arc::new(policy)
    };

    let summarizer: Arc<dyn Summarizer> = if flags.real_summarization {
        match build_llm_from_config(config) {
            Some(provider) => Arc::new(LlmSummarizer::from_config(provider, &config.summarization)),
            None => {
                error!(
                    provider = %config.summarization.provider,
                    "Real summarization enabled but no LLM API key is set; using mock summaries"
                );
                Arc::new(MockSummarizer)
            }
        }
    } else {
        Arc::new(MockSummarizer)
    };

    info!(
        real_summarization = flags.real_summarization,
        real_verification = flags.real_verification,
        "Pipeline built"
    );

    Orchestrator::new(retriever, verifier, summarizer)
        .with_deadline(config.pipeline.timeout())
        .with_query_logging(config.pipeline.log_queries)
}
