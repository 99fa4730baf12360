//! Feature flag resolution.
//!
//! Flags are boolean-like environment strings. `"true"`, `"1"`, `"yes"` and
//! `"on"` (any case) mean enabled, anything else means disabled, and an
//! absent variable falls back to the caller's default. Unparseable values
//! are never an error.

use serde::Serialize;

/// Environment variable selecting the real LLM summarization adapter.
pub const REAL_SUMMARIZATION: &str = "ENABLE_REAL_SUMMARIZATION";

/// Environment variable selecting the real verification adapter.
pub const REAL_VERIFICATION: &str = "ENABLE_REAL_VERIFICATION";

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];

/// Normalize a raw flag value.
pub fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None => default,
        Some(value) => {
            let value = value.trim();
            TRUTHY.iter().any(|t| value.eq_ignore_ascii_case(t))
        }
    }
}

/// Resolve a flag through an arbitrary lookup (environment, map, ...).
pub fn resolve_with<F>(lookup: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    parse_flag(lookup(name).as_deref(), default)
}

/// Resolve a flag from the process environment.
pub fn resolve(name: &str, default: bool) -> bool {
    resolve_with(|key| std::env::var(key).ok(), name, default)
}

/// The resolved capability switches, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub real_summarization: bool,
    pub real_verification: bool,
}
