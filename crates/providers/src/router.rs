//! Provider construction from configuration.

use std::sync::Arc;
use tracing::{info, warn};
use truthlens_config::AppConfig;
use truthlens_core::provider::Provider;
use truthlens_core::stage::NewsProvider;

use crate::gemini::GeminiProvider;
use crate::newsapi::NewsApiClient;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured LLM provider.
///
/// Returns `None` when no usable credential is configured; the caller decides
/// what to fall back to.
pub fn build_llm_from_config(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let settings = &config.summarization;
    let Some(api_key) = config.llm_api_key() else {
        warn!(provider = %settings.provider, "No LLM API key configured");
        return None;
    };

    let name = settings.provider.as_str();
    let provider: Arc<dyn Provider> = if name == "gemini" {
        let mut p = GeminiProvider::new(api_key, settings.timeout());
        if let Some(url) = &settings.base_url {
            p = p.with_base_url(url);
        }
        Arc::new(p)
    } else {
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));
        Arc::new(OpenAiCompatProvider::new(
            name,
            base_url,
            api_key,
            settings.timeout(),
        ))
    };

    info!(provider = %name, model = %settings.model, "LLM provider configured");
    Some(provider)
}

/// Build the configured news search provider.
///
/// Always succeeds; a missing credential surfaces as a configuration error
/// on the first search.
pub fn build_news_from_config(config: &AppConfig) -> Arc<dyn NewsProvider> {
    let settings = &config.retrieval;
    if settings.provider != "newsapi" {
        warn!(provider = %settings.provider, "Unknown news provider, using newsapi");
    }

    let client = NewsApiClient::from_config(settings, config.news_api_key());
    if client.is_configured() {
        info!(provider = "newsapi", "News provider configured");
    } else {
        warn!("NEWSAPI_KEY not found; retrieval will return no articles");
    }
    Arc::new(client)
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
