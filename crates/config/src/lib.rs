//! Configuration loading, validation, and management for TruthLens.
//!
//! Loads configuration from `~/.truthlens/config.toml` (or the file named by
//! `TRUTHLENS_CONFIG`) with environment variable overrides. Everything is
//! read once at startup and passed explicitly into the pipeline; no stage
//! reads the environment on its own.

pub mod flags;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use flags::FeatureFlags;

/// The root configuration structure.
///
/// Maps directly to `~/.truthlens/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// News search provider configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// LLM summarization configuration
    #[serde(default)]
    pub summarization: SummarizationConfig,

    /// Source verification configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Whole-request limits
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Filter out empty strings and template placeholders like `your_key_here`.
fn usable_key(key: &Option<String>) -> Option<&str> {
    let key = key.as_deref()?.trim();
    if key.is_empty() || (key.starts_with("your_") && key.ends_with("_here")) {
        None
    } else {
        Some(key)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Provider name; only "newsapi" is built in
    #[serde(default = "default_news_provider")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Maximum number of articles requested and returned
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

fn default_news_provider() -> String {
    "newsapi".into()
}
fn default_news_base_url() -> String {
    "https://newsapi.org/v2".into()
}
fn default_page_size() -> u32 {
    10
}
fn default_news_timeout() -> u64 {
    8
}
fn default_language() -> String {
    "en".into()
}
fn default_sort_by() -> String {
    "publishedAt".into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            provider: default_news_provider(),
            api_key: None,
            base_url: default_news_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_news_timeout(),
            language: default_language(),
            sort_by: default_sort_by(),
        }
    }
}

impl std::fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .field("sort_by", &self.sort_by)
            .finish()
    }
}

impl RetrievalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    /// Use the real LLM adapter (overridden by `ENABLE_REAL_SUMMARIZATION`)
    #[serde(default)]
    pub enabled: bool,

    /// "gemini", "openai", "openrouter", or any OpenAI-compatible name
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override the provider's well-known base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-call request timeout
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles on each retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Articles included in the prompt
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    /// Per-article content budget in the prompt, in characters
    #[serde(default = "default_max_chars_per_article")]
    pub max_chars_per_article: usize,
}

fn default_llm_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    1500
}
fn default_llm_timeout() -> u64 {
    12
}
fn default_max_retries() -> u32 {
    2
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    8000
}
fn default_max_articles() -> usize {
    5
}
fn default_max_chars_per_article() -> usize {
    200
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_llm_provider(),
            api_key: None,
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_llm_timeout(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_articles: default_max_articles(),
            max_chars_per_article: default_max_chars_per_article(),
        }
    }
}

impl std::fmt::Debug for SummarizationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("max_delay_ms", &self.max_delay_ms)
            .field("max_articles", &self.max_articles)
            .field("max_chars_per_article", &self.max_chars_per_article)
            .finish()
    }
}

impl SummarizationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Use the real verification adapter (overridden by `ENABLE_REAL_VERIFICATION`)
    #[serde(default)]
    pub enabled: bool,

    /// Hosts whose articles are marked verified (subdomains included)
    #[serde(default)]
    pub trusted_domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hard deadline for one query through all stages
    #[serde(default = "default_pipeline_timeout")]
    pub timeout_secs: u64,

    /// Log query text at info level
    #[serde(default = "default_true")]
    pub log_queries: bool,
}

fn default_pipeline_timeout() -> u64 {
    45
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_pipeline_timeout(),
            log_queries: true,
        }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from the default path plus the process environment.
    ///
    /// Environment variables:
    /// - `TRUTHLENS_CONFIG`: alternate config file path
    /// - `NEWSAPI_KEY`: news provider credential
    /// - `LLM_API_KEY` / `GEMINI_API_KEY` / `OPENAI_API_KEY`: LLM credential
    /// - `LLM_PROVIDER`, `LLM_MODEL`
    /// - `ENABLE_REAL_SUMMARIZATION`, `ENABLE_REAL_VERIFICATION`
    /// - `TRUTHLENS_HOST`, `TRUTHLENS_PORT` / `PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TRUTHLENS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_path());
        let mut config = Self::load_from(&path)?;
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path (no environment).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through an injectable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("NEWSAPI_KEY") {
            self.retrieval.api_key = Some(key);
        }

        if let Some(key) = non_empty("LLM_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.summarization.api_key = Some(key);
        }

        if let Some(provider) = non_empty("LLM_PROVIDER") {
            self.summarization.provider = provider;
        }

        if let Some(model) = non_empty("LLM_MODEL") {
            self.summarization.model = model;
        }

        // The file value is the default when the variable is absent
        self.summarization.enabled = flags::resolve_with(
            &lookup,
            flags::REAL_SUMMARIZATION,
            self.summarization.enabled,
        );
        self.verification.enabled = flags::resolve_with(
            &lookup,
            flags::REAL_VERIFICATION,
            self.verification.enabled,
        );

        if let Some(host) = non_empty("TRUTHLENS_HOST") {
            self.gateway.host = host;
        }

        if let Some(port) = non_empty("TRUTHLENS_PORT").or_else(|| non_empty("PORT")) {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("invalid port number: {port}"))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".truthlens")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.summarization;
        if !(0.0..=2.0).contains(&s.temperature) {
            return Err(ConfigError::ValidationError(
                "summarization.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if s.timeout_secs == 0 || self.retrieval.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if s.max_delay_ms < s.base_delay_ms {
            return Err(ConfigError::ValidationError(
                "summarization.max_delay_ms must be >= base_delay_ms".into(),
            ));
        }

        if s.max_articles == 0 || s.max_chars_per_article == 0 {
            return Err(ConfigError::ValidationError(
                "summarization prompt limits must be greater than zero".into(),
            ));
        }

        if !(1..=100).contains(&self.retrieval.page_size) {
            return Err(ConfigError::ValidationError(
                "retrieval.page_size must be between 1 and 100".into(),
            ));
        }

        if self.pipeline.timeout_secs <= self.retrieval.timeout_secs {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.timeout_secs ({}) must exceed retrieval.timeout_secs ({})",
                self.pipeline.timeout_secs, self.retrieval.timeout_secs
            )));
        }

        Ok(())
    }

    /// The capability switches resolved at load time.
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            real_summarization: self.summarization.enabled,
            real_verification: self.verification.enabled,
        }
    }

    /// The news provider credential, if a usable one is set.
    pub fn news_api_key(&self) -> Option<&str> {
        usable_key(&self.retrieval.api_key)
    }

    /// The LLM provider credential, if a usable one is set.
    pub fn llm_api_key(&self) -> Option<&str> {
        usable_key(&self.summarization.api_key)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for truthlens_core::Error {
    fn from(err: ConfigError) -> Self {
        truthlens_core::Error::Config {
            message: err.to_string(),
        }
    }
}
