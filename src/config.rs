// src/config.rs

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::prompt::PromptPolicy;

/// Environment variable consulted before the config file for the API key.
pub const API_KEY_ENV: &str = "SHEETSAGE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub prompt: PromptPolicy,
}

/// Connection settings for the remote completion deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Service base URL, e.g. `https://<resource>.openai.azure.com`.
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    /// Prefer [`API_KEY_ENV`]; keep keys out of committed config files.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment: "gpt".to_string(),
            api_version: "2024-02-15-preview".to_string(),
            api_key: None,
            temperature: 0.5,
            max_tokens: Some(1000),
        }
    }
}

impl CompletionConfig {
    /// The API key to send: environment first, config file second.
    pub fn resolved_api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(file = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is absent or
    /// unparseable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load config from {}: {e:#}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;

    #[test]
    fn defaults_match_the_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.completion.deployment, "gpt");
        assert_eq!(config.completion.api_version, "2024-02-15-preview");
        assert_eq!(config.completion.temperature, 0.5);
        assert_eq!(config.completion.max_tokens, Some(1000));
        assert_eq!(config.prompt.max_rows, 30);
        assert_eq!(config.prompt.max_columns, 10);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_the_rest() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            "completion:\n  endpoint: https://unit.openai.azure.com\n  temperature: 0.7\nprompt:\n  max_rows: 10\n"
        )?;
        let config = AppConfig::load(file.path())?;
        assert_eq!(config.completion.endpoint, "https://unit.openai.azure.com");
        assert_eq!(config.completion.temperature, 0.7);
        assert_eq!(config.completion.deployment, "gpt");
        assert_eq!(config.prompt.max_rows, 10);
        assert_eq!(config.prompt.max_columns, 10);
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default(Path::new("does/not/exist.yaml"));
        assert!(config.completion.endpoint.is_empty());
    }
}
