//! Parsing the model's debate output.
//!
//! Models are asked for bare JSON but often wrap it in a Markdown fence or
//! a sentence of prose. The parser strips fences, tries the whole text, then
//! falls back to the span between the first `{` and the last `}`.

use serde_json::Value;
use truthlens_core::error::SummarizeError;
use truthlens_core::query::Query;
use truthlens_core::summary::Summary;

/// Parse model output into a debate [`Summary`].
///
/// `for` and `against` must both be arrays; non-string items are dropped.
/// A missing or blank `statement` is replaced with a templated one.
pub fn parse_debate(text: &str, query: &Query) -> Result<Summary, SummarizeError> {
    let object = extract_object(text)?;

    let for_args = string_list(&object, "for")?;
    let against_args = string_list(&object, "against")?;

    let statement = object
        .get("statement")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("Debate: {}", query.text()));

    Ok(Summary::debate(statement, for_args, against_args))
}

fn extract_object(text: &str) -> Result<serde_json::Map<String, Value>, SummarizeError> {
    let cleaned = strip_code_fence(text.trim());

    let parsed = serde_json::from_str::<Value>(cleaned).ok().or_else(|| {
        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&cleaned[start..=end]).ok()
    });

    match parsed {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(SummarizeError::Parse("output is not a JSON object".into())),
        None => Err(SummarizeError::Parse("no JSON object in output".into())),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn string_list(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<String>, SummarizeError> {
    let items = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| SummarizeError::Parse(format!("missing `{key}` array")))?;

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}
