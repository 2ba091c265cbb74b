//! Configuration loading, validation, and management for the CBAM assistant.
//!
//! Loads configuration from `~/.cbam-assistant/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.cbam-assistant/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the hosted search and completion services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion model
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion retry attempts
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Minimum seconds between completion requests (global throttle)
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_secs: f64,

    /// Base backoff seconds between completion retries
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Conversation configuration
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Search service configuration
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionServiceConfig,
}

fn default_model() -> String {
    "claude-haiku-4-5".into()
}
fn default_retries() -> u32 {
    2
}
fn default_min_request_interval() -> f64 {
    2.0
}
fn default_retry_delay() -> u64 {
    5
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("retries", &self.retries)
            .field("min_request_interval_secs", &self.min_request_interval_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("retrieval", &self.retrieval)
            .field("conversation", &self.conversation)
            .field("search", &self.search)
            .field("completion", &self.completion)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Top-K matches requested from the search service
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Context length cap handed to the prompt assembler, in chars
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_num_results() -> usize {
    3
}
fn default_max_context_chars() -> usize {
    8000
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            num_results: default_num_results(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// History window length used as LLM context
    #[serde(default = "default_history_length")]
    pub history_length: usize,
}

fn default_history_length() -> usize {
    5
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_length: default_history_length(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Base URL of the hosted document-search service
    #[serde(default = "default_search_url")]
    pub base_url: String,

    /// Indexed collection the assistant queries
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-service API key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_search_url() -> String {
    "http://localhost:9200".into()
}
fn default_collection() -> String {
    "document_search_service".into()
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionServiceConfig {
    /// Base URL of the hosted completion service
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    /// Per-service API key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_completion_url() -> String {
    "http://localhost:8080".into()
}

impl Default for CompletionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for CompletionServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.cbam-assistant/config.toml).
    ///
    /// Also checks environment variables:
    /// - `CBAM_API_KEY` (highest priority)
    /// - `CBAM_MODEL` overrides the completion model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CBAM_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("CBAM_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".cbam-assistant")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.retries == 0 {
            return Err(ConfigError::ValidationError(
                "retries must be at least 1".into(),
            ));
        }

        if self.min_request_interval_secs < 0.0 {
            return Err(ConfigError::ValidationError(
                "min_request_interval_secs must be >= 0".into(),
            ));
        }

        if self.retrieval.num_results == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.num_results must be at least 1".into(),
            ));
        }

        if self.conversation.history_length == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.history_length must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            retries: default_retries(),
            min_request_interval_secs: default_min_request_interval(),
            retry_delay_secs: default_retry_delay(),
            retrieval: RetrievalConfig::default(),
            conversation: ConversationConfig::default(),
            search: SearchServiceConfig::default(),
            completion: CompletionServiceConfig::default(),
        }
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
