//! The Verification agent.
//!
//! Both adapters are order-preserving and one-to-one, and neither can fail.
//! An article is verified only when its host is a configured trusted domain
//! or a subdomain of one; with no trusted domains everything is unverified.

use async_trait::async_trait;
use tracing::debug;
use truthlens_core::article::{Article, VerifiedArticle};
use truthlens_core::stage::Verifier;

/// Host-allowlist verdicts.
#[derive(Debug, Clone, Default)]
pub struct PolicyVerifier {
    trusted_domains: Vec<String>,
}

impl PolicyVerifier {
    pub fn new(trusted_domains: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            trusted_domains: trusted_domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_trusted(&self, article: &Article) -> bool {
        let Some(host) = article.host() else {
            return false;
        };
        self.trusted_domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn apply(&self, articles: Vec<Article>) -> Vec<VerifiedArticle> {
        articles
            .into_iter()
            .map(|article| {
                let trusted = self.is_trusted(&article);
                VerifiedArticle::new(article, trusted)
            })
            .collect()
    }
}

#[async_trait]
impl Verifier for PolicyVerifier {
    async fn verify(&self, articles: Vec<Article>) -> Vec<VerifiedArticle> {
        self.apply(articles)
    }
}

/// The adapter wired when real verification is enabled.
///
/// No external provenance source exists yet, so it applies the same
/// allowlist as [`PolicyVerifier`].
#[derive(Debug, Clone, Default)]
pub struct ProvenanceVerifier {
    policy: PolicyVerifier,
}

impl ProvenanceVerifier {
    pub fn new(policy: PolicyVerifier) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Verifier for ProvenanceVerifier {
    async fn verify(&self, articles: Vec<Article>) -> Vec<VerifiedArticle> {
        debug!(
            count = articles.len(),
            "External provenance unavailable, applying domain policy"
        );
        self.policy.apply(articles)
    }
}
