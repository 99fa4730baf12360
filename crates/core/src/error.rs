//! Error types for the TruthLens domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each pipeline stage has its own error enum. Stage errors never leave the
//! pipeline; the top-level [`Error`] covers what a command-line caller can
//! hit around it.

use thiserror::Error;

/// The top-level error type for TruthLens operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Inbound request errors ---
    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Stage errors ---

/// Failures reported by an LLM completion provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Upstream server error: {message} (status: {status_code})")]
    ServerError { status_code: u16, message: String },

    #[error("Rate limited by provider (retry-after: {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Content rejected by provider policy: {0}")]
    ContentPolicy(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether the failure is worth another attempt after a backoff.
    ///
    /// Rate limits, 5xx responses, timeouts and connection failures are
    /// transient; everything else is a definitive rejection.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::ServerError { .. }
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }
}

/// Failures of the Retrieval stage.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// Network failure, timeout, rate limit or upstream 5xx.
    #[error("News provider temporarily unavailable: {0}")]
    Transient(String),

    /// Missing or rejected credentials.
    #[error("News provider configuration error: {0}")]
    Config(String),
}

/// Terminal reasons for the Summarization stage leaving the LLM path.
///
/// None of these reach the caller: each one resolves to the mock summary.
#[derive(Debug, Clone, Error)]
pub enum SummarizeError {
    #[error("No usable articles to build a prompt from: {0}")]
    Prompt(String),

    #[error("LLM credentials rejected: {0}")]
    Auth(String),

    #[error("LLM temporarily unavailable: {0}")]
    Transient(String),

    #[error("LLM refused the content: {0}")]
    Policy(String),

    #[error("LLM output could not be parsed: {0}")]
    Parse(String),

    #[error("LLM not configured: {0}")]
    Config(String),

    #[error("Unexpected summarization failure: {0}")]
    Unexpected(String),
}

impl SummarizeError {
    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizeError::Prompt(_) => "prompt",
            SummarizeError::Auth(_) => "auth",
            SummarizeError::Transient(_) => "transient",
            SummarizeError::Policy(_) => "policy",
            SummarizeError::Parse(_) => "parse",
            SummarizeError::Config(_) => "config",
            SummarizeError::Unexpected(_) => "unexpected",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SummarizeError::Transient(_))
    }
}

impl From<ProviderError> for SummarizeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthenticationFailed(m) => SummarizeError::Auth(m),
            ProviderError::ContentPolicy(m) => SummarizeError::Policy(m),
            ProviderError::InvalidResponse(m) => SummarizeError::Parse(m),
            ProviderError::NotConfigured(m) => SummarizeError::Config(m),
            ProviderError::RateLimited { .. }
            | ProviderError::ServerError { .. }
            | ProviderError::Timeout(_)
            | ProviderError::Network(_) => SummarizeError::Transient(err.to_string()),
            ProviderError::ApiError { .. } => SummarizeError::Unexpected(err.to_string()),
        }
    }
}

/// Rejections of a malformed inbound query. The only error a caller sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("query text must not be empty")]
    Empty,

    #[error("query text is {len} characters, maximum is {max}")]
    TooLong { len: usize, max: usize },
}
