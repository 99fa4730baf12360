//! Summary and response contract types.

use serde::{Deserialize, Serialize};

use crate::article::VerifiedArticle;

/// The only summary format the pipeline produces.
pub const DEBATE_FORMAT: &str = "debate";

/// A debate-format summary: a thesis with opposing argument lists.
///
/// `for`/`against` may be empty but are always present in the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub format: String,

    pub statement: String,

    #[serde(rename = "for", default)]
    pub for_args: Vec<String>,

    #[serde(rename = "against", default)]
    pub against_args: Vec<String>,
}

impl Summary {
    pub fn debate(
        statement: impl Into<String>,
        for_args: Vec<String>,
        against_args: Vec<String>,
    ) -> Self {
        Self {
            format: DEBATE_FORMAT.to_string(),
            statement: statement.into(),
            for_args,
            against_args,
        }
    }
}

/// The pipeline's output and the entire `POST /query` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub summary: Summary,
    pub sources: Vec<VerifiedArticle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_for_and_against_keys() {
        let s = Summary::debate("thesis", vec!["a".into()], vec![]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["format"], "debate");
        assert_eq!(json["for"][0], "a");
        assert!(json["against"].as_array().unwrap().is_empty());
    }
}
