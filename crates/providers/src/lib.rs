//! Outbound provider adapters for TruthLens.
//!
//! - News search: [`NewsApiClient`] implements `truthlens_core::NewsProvider`.
//! - LLM completion: [`GeminiProvider`] and [`OpenAiCompatProvider`]
//!   implement `truthlens_core::Provider`.
//!
//! The router builds the configured adapters once at startup.

pub mod gemini;
pub mod newsapi;
pub mod openai_compat;
pub mod router;
pub mod status;

#[cfg(test)]
mod test_server;

pub use gemini::GeminiProvider;
pub use newsapi::NewsApiClient;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_llm_from_config, build_news_from_config};

use std::time::Duration;

/// Build an HTTP client with a whole-request timeout.
///
/// Clients are built once per adapter and reused, so connections are pooled
/// across requests.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("truthlens/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}
