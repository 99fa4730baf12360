//! NewsAPI.org search client.
//!
//! Issues one `GET /everything` per search and hands back the raw article
//! records. Records that do not even deserialize as a [`RawArticle`] are
//! skipped here; content-level normalization is the Retrieval agent's job.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use truthlens_config::RetrievalConfig;
use truthlens_core::article::RawArticle;
use truthlens_core::error::RetrievalError;
use truthlens_core::stage::NewsProvider;

pub struct NewsApiClient {
    base_url: String,
    api_key: Option<String>,
    language: String,
    sort_by: String,
    client: reqwest::Client,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            language: "en".into(),
            sort_by: "publishedAt".into(),
            client: crate::http_client(timeout),
        }
    }

    pub fn from_config(config: &RetrievalConfig, api_key: Option<&str>) -> Self {
        let mut client = Self::new(&config.base_url, api_key.map(String::from), config.timeout());
        client.language = config.language.clone();
        client.sort_by = config.sort_by.clone();
        client
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Extract raw records from a NewsAPI body.
///
/// A body without an `articles` array yields no records; a record with the
/// wrong field types is dropped without affecting its neighbours.
pub fn parse_articles(body: &str) -> Vec<RawArticle> {
    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "News provider returned a non-JSON body");
            return Vec::new();
        }
    };

    let Some(items) = json.get("articles").and_then(|a| a.as_array()) else {
        warn!("Invalid news provider response structure: no articles array");
        return Vec::new();
    };

    let records: Vec<RawArticle> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    if records.len() < items.len() {
        debug!(
            skipped = items.len() - records.len(),
            "Skipped malformed news records"
        );
    }
    records
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawArticle>, RetrievalError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RetrievalError::Config("NEWSAPI_KEY is not set".into()));
        };

        let url = format!("{}/everything", self.base_url);
        let page_size = limit.to_string();

        debug!(provider = "newsapi", page_size = limit, "Sending search request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("apiKey", api_key),
                ("sortBy", self.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Transient(format!("request timed out: {e}"))
                } else {
                    RetrievalError::Transient(format!("connection failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            401 | 403 => {
                return Err(RetrievalError::Config(format!(
                    "news provider rejected credentials (status {status})"
                )));
            }
            429 => {
                return Err(RetrievalError::Transient("news provider rate limit".into()));
            }
            500..=599 => {
                return Err(RetrievalError::Transient(format!(
                    "news provider server error (status {status})"
                )));
            }
            _ => {
                warn!(status, "News provider returned unexpected status");
                return Ok(Vec::new());
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::Transient(format!("failed to read body: {e}")))?;

        Ok(parse_articles(&body))
    }
}
