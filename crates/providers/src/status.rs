//! HTTP status classification shared by the LLM adapters.
//!
//! Maps a non-success response onto the [`ProviderError`] taxonomy so every
//! backend reports auth, rate-limit, policy and server failures the same way.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use truthlens_core::error::ProviderError;

/// Substrings that mark a 400 as a content-policy rejection.
const POLICY_MARKERS: [&str; 5] = [
    "content_filter",
    "content_policy",
    "policy",
    "safety",
    "blocked",
];

/// Classify a non-2xx response.
pub fn classify_status(status: u16, retry_after_secs: Option<u64>, body: &str) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed(format!(
            "Invalid API key or insufficient permissions (status {status})"
        )),
        429 => ProviderError::RateLimited { retry_after_secs },
        408 => ProviderError::Timeout(format!("Upstream request timeout (status {status})")),
        500..=599 => ProviderError::ServerError {
            status_code: status,
            message: truncate(body),
        },
        400 if is_policy_rejection(body) => ProviderError::ContentPolicy(truncate(body)),
        _ => ProviderError::ApiError {
            status_code: status,
            message: truncate(body),
        },
    }
}

/// Whether an error body describes a content-policy rejection.
///
/// Looks at the structured `error` object fields used by Gemini
/// (`status`, `message`) and OpenAI-style APIs (`type`, `code`).
pub fn is_policy_rejection(body: &str) -> bool {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };
    let error = &json["error"];
    ["type", "code", "status", "message"]
        .iter()
        .filter_map(|field| error[*field].as_str())
        .map(|value| value.to_ascii_lowercase())
        .any(|value| POLICY_MARKERS.iter().any(|marker| value.contains(marker)))
}

/// Read a `Retry-After` header given in seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Map a transport failure onto the taxonomy.
pub fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 500;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses() {
        assert!(matches!(
            classify_status(401, None, ""),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            classify_status(403, None, ""),
            ProviderError::AuthenticationFailed(_)
        ));
    }

    #[test]
    fn rate_limit_keeps_retry_after() {
        match classify_status(429, Some(30), "") {
            ProviderError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, Some(30))
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn server_errors_are_retryable() {
        for status in [500, 502, 503, 504] {
            let err = classify_status(status, None, "oops");
            assert!(err.is_retryable(), "{status} should be retryable");
        }
    }

    #[test]
    fn policy_400_detected_from_openai_body() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"content_filter","message":"flagged"}}"#;
        assert!(matches!(
            classify_status(400, None, body),
            ProviderError::ContentPolicy(_)
        ));
    }

    #[test]
    fn policy_400_detected_from_gemini_body() {
        let body = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"Request blocked by safety settings"}}"#;
        assert!(matches!(
            classify_status(400, None, body),
            ProviderError::ContentPolicy(_)
        ));
    }

    #[test]
    fn plain_400_is_api_error() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#;
        let err = classify_status(400, None, body);
        assert!(matches!(err, ProviderError::ApiError { status_code: 400, .. }));
        assert!(!err.is_retryable());

        assert!(matches!(
            classify_status(400, None, "not json at all"),
            ProviderError::ApiError { .. }
        ));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        match classify_status(502, None, &body) {
            ProviderError::ServerError { message, .. } => assert!(message.chars().count() <= 501),
            other => panic!("expected ServerError, got {other:?}"),
        }
    }
}
