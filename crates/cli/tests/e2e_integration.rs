//! End-to-end integration tests for the TruthLens query pipeline.
//!
//! These tests exercise the full chain from query to `QueryResult`
//! (retrieval, verification, summarization and the orchestrator) with
//! scripted news and LLM backends standing in for the network.

use std::sync::Arc;
use std::time::Duration;

use truthlens_agent::{
    LlmSummarizer, MockSummarizer, Orchestrator, PolicyVerifier, ProvenanceVerifier,
    RetrievalAgent, mock_summary,
};
use truthlens_core::article::{Article, RawArticle};
use truthlens_core::error::{ProviderError, RetrievalError};
use truthlens_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use truthlens_core::query::Query;
use truthlens_core::stage::{NewsProvider, Verifier};

// ── Scripted backends ────────────────────────────────────────────────────

/// An LLM provider that returns scripted outcomes in sequence.
struct ScriptedProvider {
    outcomes: std::sync::Mutex<Vec<Result<String, ProviderError>>>,
    call_count: std::sync::Mutex<usize>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: std::sync::Mutex::new(outcomes),
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();
        if *count >= outcomes.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                *count,
                outcomes.len()
            );
        }
        let outcome = outcomes[*count].clone();
        *count += 1;
        outcome.map(|text| CompletionResponse {
            text,
            model: request.model,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A news backend with a fixed answer.
struct ScriptedNews(Result<Vec<RawArticle>, RetrievalError>);

#[async_trait::async_trait]
impl NewsProvider for ScriptedNews {
    fn name(&self) -> &str {
        "e2e_news"
    }

    async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<RawArticle>, RetrievalError> {
        self.0.clone()
    }
}

fn three_articles() -> Vec<RawArticle> {
    [
        ("https://www.reuters.com/climate-1", "Senate debates carbon tax"),
        ("https://apnews.com/climate-2", "Cities adopt clean energy targets"),
        ("https://example.org/climate-3", "Critics question emissions caps"),
    ]
    .into_iter()
    .map(|(url, title)| RawArticle {
        url: Some(url.into()),
        title: Some(title.into()),
        description: Some(format!("Coverage: {title}")),
        source: Some(serde_json::json!({"id": null, "name": "Wire"})),
        ..RawArticle::default()
    })
    .collect()
}

fn rate_limited() -> Result<String, ProviderError> {
    Err(ProviderError::RateLimited {
        retry_after_secs: Some(1),
    })
}

const LLM_DEBATE: &str = r#"```json
{"statement": "Climate policy should price carbon", "for": ["Markets cut emissions cheaply"], "against": ["Costs fall on households"]}
```"#;

fn pipeline(news: ScriptedNews, provider: Option<Arc<ScriptedProvider>>) -> Orchestrator {
    let retriever = Arc::new(RetrievalAgent::new(Arc::new(news), 10));
    let verifier = Arc::new(PolicyVerifier::default());
    match provider {
        Some(provider) => Orchestrator::new(
            retriever,
            verifier,
            Arc::new(LlmSummarizer::new(provider, "e2e-model")),
        ),
        None => Orchestrator::new(retriever, verifier, Arc::new(MockSummarizer)),
    }
}

fn climate() -> Query {
    Query::new("climate policy").unwrap()
}

// ── E2E: Mock summarization ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_climate_policy_with_mock_summary() {
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), None);
    let result = orchestrator.handle(climate()).await;

    assert_eq!(result.sources.len(), 3);
    assert!(result.sources.iter().all(|s| !s.is_verified));
    assert_eq!(result.summary.format, "debate");
    assert!(result.summary.statement.contains("climate policy"));
}

#[tokio::test]
async fn e2e_mock_summary_is_deterministic() {
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), None);
    let first = orchestrator.handle(climate()).await;
    let second = orchestrator.handle(climate()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn e2e_every_valid_length_gets_a_debate_summary() {
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), None);
    for len in [1, 2, 250, 499, 500] {
        let query = Query::new("a".repeat(len)).unwrap();
        let result = orchestrator.handle(query).await;
        assert_eq!(result.summary.format, "debate", "length {len}");
    }
}

// ── E2E: Degraded retrieval ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_news_timeout_degrades_to_empty_sources() {
    let news = ScriptedNews(Err(RetrievalError::Transient("request timed out".into())));
    let result = pipeline(news, None).handle(climate()).await;

    assert!(result.sources.is_empty());
    assert_eq!(result.summary, mock_summary(&climate(), &[]));
}

#[tokio::test]
async fn e2e_unreachable_news_api_degrades() {
    // Nothing listens on the discard port; the connection is refused.
    let client = truthlens_providers::NewsApiClient::new(
        "http://127.0.0.1:9",
        Some("e2e-key".into()),
        Duration::from_secs(2),
    );
    let orchestrator = Orchestrator::new(
        Arc::new(RetrievalAgent::new(Arc::new(client), 10)),
        Arc::new(PolicyVerifier::default()),
        Arc::new(MockSummarizer),
    );

    let result = orchestrator.handle(climate()).await;
    assert!(result.sources.is_empty());
    assert_eq!(result.summary.format, "debate");
}

#[tokio::test]
async fn e2e_missing_news_key_degrades() {
    let news = ScriptedNews(Err(RetrievalError::Config("NEWSAPI_KEY is not set".into())));
    let result = pipeline(news, None).handle(climate()).await;
    assert!(result.sources.is_empty());
}

// ── E2E: LLM summarization ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_two_rate_limits_then_success() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        rate_limited(),
        rate_limited(),
        Ok(LLM_DEBATE.into()),
    ]));
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), Some(provider.clone()));

    let result = orchestrator.handle(climate()).await;

    assert_eq!(provider.calls(), 3);
    assert_eq!(result.summary.statement, "Climate policy should price carbon");
    assert_eq!(result.summary.for_args, vec!["Markets cut emissions cheaply"]);
    assert_eq!(result.sources.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn e2e_auth_failure_is_not_retried() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        ProviderError::AuthenticationFailed("Invalid API key (status 401)".into()),
    )]));
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), Some(provider.clone()));

    let result = orchestrator.handle(climate()).await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(result.summary, mock_summary(&climate(), &result.sources));
}

#[tokio::test(start_paused = true)]
async fn e2e_persistent_outage_exhausts_retries() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        rate_limited(),
        rate_limited(),
        rate_limited(),
    ]));
    let orchestrator = pipeline(ScriptedNews(Ok(three_articles())), Some(provider.clone()));

    let result = orchestrator.handle(climate()).await;

    assert_eq!(provider.calls(), 3);
    assert_eq!(result.sources.len(), 3);
    assert!(result.summary.statement.starts_with("Analysis of 'climate policy'"));
}

#[tokio::test(start_paused = true)]
async fn e2e_no_articles_never_calls_llm() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let orchestrator = pipeline(ScriptedNews(Ok(vec![])), Some(provider.clone()));

    let result = orchestrator.handle(climate()).await;

    assert_eq!(provider.calls(), 0);
    assert_eq!(result.summary.statement, "No articles found for: climate policy");
}

// ── E2E: Verification ────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_verification_preserves_order_and_count() {
    let articles: Vec<Article> = (0..7)
        .map(|i| Article::new(format!("https://site{i}.com/a"), format!("T{i}"), "", "S"))
        .collect();

    let verifiers: Vec<Arc<dyn Verifier>> = vec![
        Arc::new(PolicyVerifier::default()),
        Arc::new(ProvenanceVerifier::new(PolicyVerifier::new(["site3.com"]))),
    ];
    for verifier in verifiers {
        assert!(verifier.verify(Vec::new()).await.is_empty());

        let verified = verifier.verify(articles.clone()).await;
        assert_eq!(verified.len(), articles.len());
        for (v, a) in verified.iter().zip(&articles) {
            assert_eq!(v.url, a.url);
        }
    }
}

#[tokio::test]
async fn e2e_trusted_domain_marks_sources_verified() {
    let orchestrator = Orchestrator::new(
        Arc::new(RetrievalAgent::new(
            Arc::new(ScriptedNews(Ok(three_articles()))),
            10,
        )),
        Arc::new(ProvenanceVerifier::new(PolicyVerifier::new(["reuters.com"]))),
        Arc::new(MockSummarizer),
    );
    let result = orchestrator.handle(climate()).await;
    let flags: Vec<bool> = result.sources.iter().map(|s| s.is_verified).collect();
    assert_eq!(flags, vec![true, false, false]);
}

// ── E2E: HTTP surface ────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_http_query_roundtrip() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let state = Arc::new(truthlens_gateway::GatewayState {
        orchestrator: pipeline(ScriptedNews(Ok(three_articles())), None),
    });
    let app = truthlens_gateway::build_router(state, &truthlens_config::GatewayConfig::default());

    let req = Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"query":"climate policy"}"#))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["sources"].as_array().unwrap().len(), 3);
    assert_eq!(body["sources"][0]["source_name"], "Wire");
    assert_eq!(body["summary"]["format"], "debate");
}
