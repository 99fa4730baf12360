//! Debate prompt construction.

use truthlens_config::SummarizationConfig;
use truthlens_core::article::VerifiedArticle;
use truthlens_core::error::SummarizeError;
use truthlens_core::query::Query;

/// Bounds applied to the article material placed in a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSettings {
    pub max_articles: usize,
    pub max_chars_per_article: usize,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            max_articles: 5,
            max_chars_per_article: 200,
        }
    }
}

impl PromptSettings {
    pub fn from_config(config: &SummarizationConfig) -> Self {
        Self {
            max_articles: config.max_articles.max(1),
            max_chars_per_article: config.max_chars_per_article,
        }
    }
}

/// Build the prompt asking the model for a debate-format JSON object.
///
/// Articles with a blank title are skipped. Fails with
/// [`SummarizeError::Prompt`] when nothing usable is left.
pub fn build_debate_prompt(
    query: &Query,
    articles: &[VerifiedArticle],
    settings: &PromptSettings,
) -> Result<String, SummarizeError> {
    let usable: Vec<&VerifiedArticle> = articles
        .iter()
        .filter(|a| !a.title.trim().is_empty())
        .take(settings.max_articles)
        .collect();

    if usable.is_empty() {
        return Err(SummarizeError::Prompt(format!(
            "{} articles supplied, none with a title",
            articles.len()
        )));
    }

    let material: String = usable
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!(
                "Article {n}:\nTitle: {title}\nSource: {source}\nURL: {url}\nContent: {content}\n\n",
                n = i + 1,
                title = article.title.trim(),
                source = article.source_name,
                url = article.url,
                content = truncate_chars(article.content.trim(), settings.max_chars_per_article),
            )
        })
        .collect();

    Ok(format!(
        "You are a balanced news analyst. Based on the news articles below, \
produce a debate about the topic \"{query}\".\n\n\
{material}\
Respond with a single JSON object and nothing else, using exactly this shape:\n\
{{\n  \"statement\": \"a one-sentence thesis about the topic\",\n  \
\"for\": [\"argument supporting the thesis\", \"...\"],\n  \
\"against\": [\"argument opposing the thesis\", \"...\"]\n}}\n\
Give 2 to 4 arguments on each side, each grounded in the articles.",
        query = query.text(),
    ))
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
