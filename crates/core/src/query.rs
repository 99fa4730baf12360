//! The inbound query value.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// A validated, immutable user query.
///
/// Construction trims surrounding whitespace and rejects empty or
/// oversized text, so every `Query` in the pipeline holds 1..=500 chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    text: String,
}

impl Query {
    pub fn new(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        let len = trimmed.chars().count();
        if len > MAX_QUERY_CHARS {
            return Err(ValidationError::TooLong {
                len,
                max: MAX_QUERY_CHARS,
            });
        }

        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for Query {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.text
    }
}
