//! Configuration management for asksh.
//!
//! Configuration is loaded from `~/.config/asksh/config.toml`. On first run
//! a default file is written with a placeholder API key so the user has
//! something concrete to edit.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder written into the default config. The completion client
/// refuses to start while the key is still set to this value.
pub const OPENAI_KEY_PLACEHOLDER: &str = "your-openai-api-key";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint configuration.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Endpoint configuration for the chat-completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Model name (default: gpt-4o-mini).
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat completions URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// API key (prefer ASKSH_OPENAI_API_KEY or OPENAI_API_KEY env vars).
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Request timeout in seconds. Unset means no timeout at all, which
    /// matches the historical behavior of this tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            url: default_url(),
            api_key: default_api_key(),
            request_timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_api_key() -> String {
    OPENAI_KEY_PLACEHOLDER.to_string()
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("asksh"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, writing the default on first run.
    ///
    /// Environment variables `ASKSH_OPENAI_API_KEY` and `OPENAI_API_KEY`
    /// (in that order) override the key from the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            let config = Self::default();
            config.save()?;
            eprintln!(
                "Created default config at {}\nSet your API key there before first use.",
                path.display()
            );
            config
        };

        if let Some(key) = env_api_key() {
            config.openai.api_key = key;
        }

        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

fn env_api_key() -> Option<String> {
    std::env::var("ASKSH_OPENAI_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok()
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.api_key, OPENAI_KEY_PLACEHOLDER);
        assert!(config.openai.request_timeout_secs.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("gpt-4o-mini"));
        assert!(toml.contains(OPENAI_KEY_PLACEHOLDER));
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
[openai]
model = "gpt-4o"
api_key = "sk-test"
request_timeout_secs = 30
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.api_key, "sk-test");
        assert_eq!(config.openai.request_timeout_secs, Some(30));
        // URL falls back to the default endpoint.
        assert_eq!(config.openai.url, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.openai.api_key, OPENAI_KEY_PLACEHOLDER);
    }
}
