//! Configuration loading, validation, and management for patternlab.
//!
//! Loads configuration from `~/.patternlab/config.toml` with environment
//! variable overrides. Validates all settings at load time. Every section
//! has defaults, so an absent file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.patternlab/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-generation provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Which agent patterns run, and their parameters
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Which built-in tools are registered
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Comparison-run settings
    #[serde(default)]
    pub testing: TestingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "openai", "anthropic", "openrouter", "ollama", ...
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API key (environment variables are consulted when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom endpoint base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_true() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            api_url: None,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("llm", &self.llm)
            .field("agents", &self.agents)
            .field("tools", &self.tools)
            .field("testing", &self.testing)
            .finish()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub chain_of_thought: PatternToggle,

    #[serde(default)]
    pub react: ReactConfig,

    #[serde(default)]
    pub plan_execute: PatternToggle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PatternToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Upper bound on Thought/Action iterations per query
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    10
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub calculator: ToolToggle,

    #[serde(default)]
    pub search: ToolToggle,

    #[serde(default)]
    pub weather: ToolToggle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ToolToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingConfig {
    /// Where run reports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Test-case corpus file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/results")
}
fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/test_cases/all_test_cases.json")
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            corpus_path: default_corpus_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, then apply env overrides.
    ///
    /// Environment variables:
    /// - `PATTERNLAB_PROVIDER`, `PATTERNLAB_MODEL` override the LLM section
    /// - `PATTERNLAB_API_KEY` (highest priority), then the provider-specific
    ///   `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` / `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
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

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("PATTERNLAB_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("PATTERNLAB_MODEL") {
            self.llm.model = model;
        }

        if let Some(key) = lookup("PATTERNLAB_API_KEY") {
            self.llm.api_key = Some(key);
        } else if self.llm.api_key.is_none() {
            let provider_var = match self.llm.provider.as_str() {
                "anthropic" => Some("ANTHROPIC_API_KEY"),
                "openrouter" => Some("OPENROUTER_API_KEY"),
                "openai" => Some("OPENAI_API_KEY"),
                _ => None,
            };
            self.llm.api_key = provider_var.and_then(&lookup);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".patternlab")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agents.react.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agents.react.max_iterations must be at least 1".into(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("llm.model must not be empty".into()));
        }

        Ok(())
    }

    /// Check if an API key is available.
    pub fn has_api_key(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `config` command).
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
