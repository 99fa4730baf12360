//! The Retrieval agent.
//!
//! Sanitises the query, asks the configured [`NewsProvider`] for records and
//! normalises them into canonical [`Article`]s. Every returned article has a
//! non-empty `http(s)` URL and a non-empty title.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use truthlens_core::article::{Article, RawArticle};
use truthlens_core::error::RetrievalError;
use truthlens_core::query::Query;
use truthlens_core::stage::{NewsProvider, Retriever};
use url::Url;

/// Placeholder NewsAPI puts in every field of a taken-down article.
const REMOVED_MARKER: &str = "[Removed]";

/// Characters of description used when a record has no title.
const TITLE_FALLBACK_CHARS: usize = 100;

const UNKNOWN_SOURCE: &str = "Unknown";

pub struct RetrievalAgent {
    provider: Arc<dyn NewsProvider>,
    page_size: u32,
}

impl RetrievalAgent {
    pub fn new(provider: Arc<dyn NewsProvider>, page_size: u32) -> Self {
        Self {
            provider,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl Retriever for RetrievalAgent {
    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, RetrievalError> {
        let sanitized = sanitize_query(query.text());
        if sanitized.is_empty() {
            debug!("Query empty after sanitisation, skipping search");
            return Ok(Vec::new());
        }

        let records = self.provider.search(&sanitized, self.page_size).await?;
        let received = records.len();
        let articles = normalize(records, self.page_size as usize);

        info!(
            provider = %self.provider.name(),
            received,
            kept = articles.len(),
            "Articles retrieved"
        );
        Ok(articles)
    }
}

/// Strip quote, comment and escape sequences, then collapse whitespace.
pub fn sanitize_query(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in ["--", "/*", "*/", "'", "\"", ";", "\\"] {
        cleaned = cleaned.replace(pattern, " ");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map provider records to canonical articles.
///
/// Drops records without an `http(s)` URL or without any usable title,
/// removes duplicate URLs, and keeps at most `limit` articles in provider
/// order.
pub fn normalize(records: Vec<RawArticle>, limit: usize) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for record in records {
        if articles.len() >= limit {
            break;
        }
        let Some(article) = normalize_one(&record) else {
            continue;
        };
        if seen.insert(article.url.clone()) {
            articles.push(article);
        }
    }
    articles
}

fn normalize_one(record: &RawArticle) -> Option<Article> {
    let url = web_url(record.url.as_deref()?)?;

    let description = usable(record.description.as_deref());
    let title = usable(record.title.as_deref())
        .map(String::from)
        .or_else(|| description.map(|d| d.chars().take(TITLE_FALLBACK_CHARS).collect()))?;

    let content = usable(record.content.as_deref())
        .or(description)
        .map(strip_truncation_marker)
        .unwrap_or_default();

    let source_name = record.source_name().unwrap_or(UNKNOWN_SOURCE);

    let mut article = Article::new(url, title.trim(), content, source_name);
    article.published_at = record.published_at();
    Some(article)
}

/// An absolute `http(s)` URL with a host, in its serialized form.
fn web_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(parsed.into())
}

fn usable(field: Option<&str>) -> Option<&str> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != REMOVED_MARKER)
}

/// NewsAPI cuts `content` and appends `" [+1234 chars]"`.
fn strip_truncation_marker(content: &str) -> String {
    if let Some(idx) = content.rfind(" [+")
        && content.ends_with(" chars]")
    {
        return content[..idx].trim_end().to_string();
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StaticNews, raw};

    #[test]
    fn sanitize_strips_injection_characters() {
        assert_eq!(sanitize_query("climate 'policy'; DROP--"), "climate policy DROP");
        assert_eq!(sanitize_query("  a   /* b */ \"c\" \\ d "), "a b c d");
        assert_eq!(sanitize_query("';--"), "");
        assert_eq!(sanitize_query("AI regulation"), "AI regulation");
    }

    #[test]
    fn drops_records_without_url_or_title() {
        let records = vec![
            RawArticle {
                title: Some("No url".into()),
                ..RawArticle::default()
            },
            RawArticle {
                url: Some("ftp://example.com/x".into()),
                title: Some("Bad scheme".into()),
                ..RawArticle::default()
            },
            RawArticle {
                url: Some("https://example.com/untitled".into()),
                ..RawArticle::default()
            },
            raw("https://example.com/ok", "Good"),
        ];
        let articles = normalize(records, 10);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Good");
        assert_eq!(articles[0].source_name, "Example News");
    }

    #[test]
    fn unusable_urls_are_dropped() {
        let records = vec![
            raw("https://", "Hostless"),
            raw("https://exa mple.com/a b", "Spaces"),
            raw("mailto:desk@example.com", "Mail"),
            raw("/relative/path", "Relative"),
            raw("  https://Example.com/a b  ", "Kept"),
        ];
        let articles = normalize(records, 10);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
        assert_eq!(articles[0].url, "https://example.com/a%20b");
    }

    #[test]
    fn removed_placeholder_is_dropped() {
        let records = vec![RawArticle {
            url: Some("https://removed.com".into()),
            title: Some("[Removed]".into()),
            description: Some("[Removed]".into()),
            ..RawArticle::default()
        }];
        assert!(normalize(records, 10).is_empty());
    }

    #[test]
    fn title_falls_back_to_description() {
        let records = vec![RawArticle {
            url: Some("https://example.com/a".into()),
            description: Some("d".repeat(150)),
            ..RawArticle::default()
        }];
        let articles = normalize(records, 10);
        assert_eq!(articles[0].title.chars().count(), 100);
        assert_eq!(articles[0].content.len(), 150);
        assert_eq!(articles[0].source_name, "Unknown");
    }

    #[test]
    fn duplicates_and_limit() {
        let records = vec![
            raw("https://example.com/1", "One"),
            raw("https://example.com/1", "One again"),
            raw("https://example.com/2", "Two"),
            raw("https://example.com/3", "Three"),
        ];
        let articles = normalize(records, 2);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn truncation_marker_is_removed() {
        assert_eq!(
            strip_truncation_marker("Lawmakers voted on Tuesday… [+2345 chars]"),
            "Lawmakers voted on Tuesday…"
        );
        assert_eq!(strip_truncation_marker("plain"), "plain");
    }

    #[test]
    fn never_returns_empty_url_or_title() {
        let payloads = vec![
            RawArticle::default(),
            RawArticle {
                url: Some("   ".into()),
                title: Some("   ".into()),
                ..RawArticle::default()
            },
            RawArticle {
                url: Some("https://x.com".into()),
                title: Some("  ".into()),
                description: Some("  ".into()),
                ..RawArticle::default()
            },
            raw("https://y.com", "Y"),
        ];
        for article in normalize(payloads, 10) {
            assert!(!article.url.is_empty());
            assert!(!article.title.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn fetch_passes_sanitised_query_and_page_size() {
        let news = Arc::new(StaticNews::ok(vec![
            raw("https://a.com/1", "A"),
            raw("https://b.com/2", "B"),
        ]));
        let agent = RetrievalAgent::new(news.clone(), 10);
        let articles = agent
            .fetch(&Query::new("climate; policy").unwrap())
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(news.calls(), vec![("climate policy".to_string(), 10)]);
    }

    #[tokio::test]
    async fn fully_sanitised_query_skips_provider() {
        let news = Arc::new(StaticNews::ok(vec![raw("https://a.com/1", "A")]));
        let agent = RetrievalAgent::new(news.clone(), 10);
        let articles = agent.fetch(&Query::new("'';;").unwrap()).await.unwrap();

        assert!(articles.is_empty());
        assert!(news.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let news = Arc::new(StaticNews::failing(RetrievalError::Transient("timeout".into())));
        let agent = RetrievalAgent::new(news, 10);
        let result = agent.fetch(&Query::new("q").unwrap()).await;
        assert!(matches!(result, Err(RetrievalError::Transient(_))));
    }
}
