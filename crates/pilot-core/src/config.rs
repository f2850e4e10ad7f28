//! User configuration for shellpilot
//!
//! Configuration file: ~/.config/shellpilot/config.toml (or platform equivalent)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::anthropic::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Model client settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Where and when conversations are saved
    #[serde(default)]
    pub session: SessionConfig,

    /// REPL settings
    #[serde(default)]
    pub repl: ReplConfig,
}

/// Model client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub name: String,

    /// Maximum tokens to generate per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Session file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory for `conversation_*.json` files
    #[serde(default = "default_session_dir")]
    pub dir: PathBuf,

    /// Save the conversation on exit
    #[serde(default)]
    pub auto_save: bool,
}

/// REPL-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Replaces the built-in system prompt
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Maximum input history entries to keep
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_session_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_history_size() -> usize {
    1000
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
            auto_save: false,
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            history_size: default_history_size(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("shellpilot").join("config.toml"))
    }

    /// Write a commented default configuration file
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::create_default_at(&path)?;
        Ok(path)
    }

    /// Write a commented default configuration file at `path`
    pub fn create_default_at(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = r#"# shellpilot configuration
# Location: ~/.config/shellpilot/config.toml

[model]
# Model used for every reply
name = "claude-3-5-sonnet-20241022"

# Maximum tokens per reply
max_tokens = 1024

# API endpoint
base_url = "https://api.anthropic.com"

# Give up on a model request after this many seconds
request_timeout_secs = 120

# Environment variable that holds the API key
api_key_env = "ANTHROPIC_API_KEY"

[session]
# Directory for saved conversations
dir = "."

# Save the conversation on exit
auto_save = false

[repl]
# Replace the built-in system prompt
# system_prompt = "You are a careful shell assistant."

# Maximum input history entries to keep
history_size = 1000
"#;

        fs::write(path, default_config)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert_eq!(config.model.max_tokens, 1024);
        assert_eq!(config.session.dir, PathBuf::from("."));
        assert!(!config.session.auto_save);
        assert_eq!(config.repl.history_size, 1000);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[model]
name = "claude-3-haiku-20240307"

[session]
auto_save = true
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.model.name, "claude-3-haiku-20240307");
        assert_eq!(config.model.api_key_env, "ANTHROPIC_API_KEY");
        assert!(config.session.auto_save);
        assert!(config.repl.system_prompt.is_none());
    }

    #[test]
    fn test_created_default_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::create_default_at(&path).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model.request_timeout_secs, 120);

        assert!(Config::create_default_at(&path).is_err());
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[model\nname = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
