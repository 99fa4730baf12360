//! Deterministic mock summaries.

use async_trait::async_trait;
use truthlens_core::article::VerifiedArticle;
use truthlens_core::query::Query;
use truthlens_core::stage::Summarizer;
use truthlens_core::summary::Summary;

/// Titles feeding the `for` list; the following titles feed `against`.
const FOR_TITLES: usize = 3;
const AGAINST_TITLES: usize = 2;

/// Derive a debate summary from the query and article titles alone.
///
/// Same input, same output. Used when real summarization is off and as the
/// terminal fallback of the LLM path.
pub fn mock_summary(query: &Query, articles: &[VerifiedArticle]) -> Summary {
    let q = query.text();

    if articles.is_empty() {
        return Summary::debate(
            format!("No articles found for: {q}"),
            vec!["No supporting arguments available".into()],
            vec!["No opposing arguments available".into()],
        );
    }

    let titles: Vec<&str> = articles
        .iter()
        .map(|a| a.title.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let mut for_args: Vec<String> = titles
        .iter()
        .take(FOR_TITLES)
        .map(|t| format!("According to '{t}': Supporting perspective on {q}"))
        .collect();
    let mut against_args: Vec<String> = titles
        .iter()
        .skip(FOR_TITLES)
        .take(AGAINST_TITLES)
        .map(|t| format!("Per '{t}': Alternative view on {q}"))
        .collect();

    if for_args.is_empty() {
        for_args.push(format!("General support for query: {q}"));
    }
    if against_args.is_empty() {
        against_args.push(format!("Potential concerns about: {q}"));
    }

    Summary::debate(
        format!("Analysis of '{q}' based on {} sources", articles.len()),
        for_args,
        against_args,
    )
}

/// The summarizer wired when real summarization is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSummarizer;

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, query: &Query, articles: &[VerifiedArticle]) -> Summary {
        mock_summary(query, articles)
    }
}
