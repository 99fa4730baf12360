//! Article shapes passed between pipeline stages.
//!
//! `RawArticle` is whatever a news provider hands back, with every field
//! optional. `Article` is the canonical, normalized shape downstream stages
//! rely on, and `VerifiedArticle` adds the verification verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A canonical news article produced by the Retrieval stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Absolute `http(s)` URL, never empty
    pub url: String,

    /// Headline, never empty
    pub title: String,

    /// Body text or description; may be empty
    #[serde(default)]
    pub content: String,

    /// Publisher name as reported by the provider
    pub source_name: String,

    /// Publication time, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            source_name: source_name.into(),
            published_at: None,
        }
    }

    /// Host part of the URL, lowercased, without port or credentials.
    pub fn host(&self) -> Option<String> {
        let parsed = Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        (!host.is_empty()).then_some(host)
    }
}

/// An [`Article`] plus the Verification stage's verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedArticle {
    #[serde(flatten)]
    pub article: Article,

    pub is_verified: bool,
}

impl VerifiedArticle {
    pub fn new(article: Article, is_verified: bool) -> Self {
        Self {
            article,
            is_verified,
        }
    }

    pub fn unverified(article: Article) -> Self {
        Self::new(article, false)
    }
}

impl std::ops::Deref for VerifiedArticle {
    type Target = Article;

    fn deref(&self) -> &Self::Target {
        &self.article
    }
}

/// A provider record before normalization.
///
/// Field aliases cover the common spellings used by news search APIs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default, alias = "link")]
    pub url: Option<String>,

    #[serde(default, alias = "headline")]
    pub title: Option<String>,

    #[serde(default, alias = "body")]
    pub content: Option<String>,

    #[serde(default, alias = "summary", alias = "snippet")]
    pub description: Option<String>,

    /// Either `{"id": .., "name": ..}` or a bare string
    #[serde(default)]
    pub source: Option<serde_json::Value>,

    #[serde(default, alias = "publishedAt", alias = "published")]
    pub published_at: Option<String>,
}

impl RawArticle {
    /// The publisher name, whichever shape `source` arrived in.
    pub fn source_name(&self) -> Option<&str> {
        let name = match self.source.as_ref()? {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map.get("name").and_then(|v| v.as_str()),
            _ => None,
        };
        name.map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
