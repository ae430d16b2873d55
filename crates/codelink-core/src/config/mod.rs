//! Configuration management for codelink.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `codelink.toml` file
//! 3. User config `~/.config/codelink/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File selection and worker pool settings.
    pub ingestion: IngestionConfig,

    /// Summarizer backend.
    pub llm: LLMConfig,

    /// Graph store location.
    pub graph: GraphConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./codelink.toml` (project local)
    /// 2. `~/.config/codelink/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("codelink.toml").exists() {
            return Self::from_file("codelink.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("codelink").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.include_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "ingestion.include_extensions must not be empty".to_string(),
            ));
        }
        if self.ingestion.max_summary_lines == 0 {
            return Err(ConfigError::Invalid(
                "ingestion.max_summary_lines must be at least 1".to_string(),
            ));
        }
        match self.llm.provider.as_str() {
            "ollama" | "openai" | "none" => Ok(()),
            other => Err(ConfigError::Invalid(format!("unknown llm.provider '{}'", other))),
        }
    }

    fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("CODELINK_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("CODELINK_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("CODELINK_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("CODELINK_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }

        // Ingestion overrides
        if let Ok(workers) = std::env::var("CODELINK_MAX_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.ingestion.max_workers = n;
            }
        }

        // Graph overrides
        if let Ok(dir) = std::env::var("CODELINK_DATA_DIR") {
            self.graph.data_dir = dir;
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

/// File selection and concurrency settings for ingestion runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// File extensions to ingest (without leading dot).
    pub include_extensions: Vec<String>,

    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,

    /// Files processed at the same time.
    pub max_workers: usize,

    /// Lines of an entity body sent to the summarizer.
    pub max_summary_lines: usize,

    /// Files above this size (bytes) are skipped.
    pub max_file_size: u64,

    /// Skip dot-files and dot-directories during discovery.
    pub skip_hidden: bool,

    /// Skip paths matched by `.gitignore` files, inside or outside a git repo.
    pub respect_gitignore: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            include_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_workers: DEFAULT_MAX_WORKERS,
            max_summary_lines: DEFAULT_MAX_SUMMARY_LINES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            skip_hidden: true,
            respect_gitignore: true,
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "ollama", "openai", or "none" for offline runs.
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for the OpenAI-compatible endpoint.
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "openai" => DEFAULT_OPENAI_MODEL.to_string(),
            _ => DEFAULT_OLLAMA_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider.as_str() {
            "openai" => DEFAULT_OPENAI_URL.to_string(),
            _ => DEFAULT_OLLAMA_URL.to_string(),
        })
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CODELINK_LLM_API_KEY").ok())
            .or_else(|| match self.provider.as_str() {
                "openai" => std::env::var("OPENAI_API_KEY").ok(),
                _ => None,
            })
    }
}

/// Graph store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Base directory for codelink data (default: ".codelink").
    pub data_dir: String,

    /// SurrealDB namespace.
    pub namespace: String,

    /// SurrealDB database.
    pub database: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl GraphConfig {
    /// Full path to the RocksDB directory.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DEFAULT_GRAPH_DIR)
    }
}
