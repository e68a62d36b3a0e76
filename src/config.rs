//! Configuration management for InfoFlow
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{InfoFlowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for InfoFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Session store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Voice capture and speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Provider configuration
///
/// Specifies which model provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout for model calls (seconds)
    #[serde(default = "default_ollama_timeout")]
    pub timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "tinyllama".to_string()
}

fn default_ollama_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            timeout_seconds: default_ollama_timeout(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the session file; defaults to the user data directory
    #[serde(default)]
    pub path: Option<String>,
}

/// Voice capture and speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether assistant replies are spoken aloud by default
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,

    /// External text-to-speech command (program plus arguments);
    /// the reply text is appended as the final argument
    #[serde(default = "default_synthesizer_command")]
    pub synthesizer_command: Vec<String>,

    /// External speech-to-text command printing a transcript on stdout
    #[serde(default)]
    pub transcriber_command: Option<Vec<String>>,

    /// Maximum listening window for voice capture (seconds)
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_seconds: u64,
}

fn default_speech_enabled() -> bool {
    true
}

fn default_synthesizer_command() -> Vec<String> {
    vec!["espeak".to_string()]
}

fn default_capture_timeout() -> u64 {
    5
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            synthesizer_command: default_synthesizer_command(),
            transcriber_command: None,
            capture_timeout_seconds: default_capture_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| InfoFlowError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| InfoFlowError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("INFOFLOW_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("INFOFLOW_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(path) = std::env::var(crate::store::SESSIONS_FILE_ENV) {
            self.store.path = Some(path);
        }

        if let Ok(enabled) = std::env::var("INFOFLOW_SPEECH_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "on" => self.speech.enabled = true,
                "0" | "false" | "off" => self.speech.enabled = false,
                other => tracing::warn!("Invalid INFOFLOW_SPEECH_ENABLED: {}", other),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.sessions_file {
            self.store.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any setting is structurally invalid
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "ollama" {
            return Err(InfoFlowError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        if self.provider.ollama.host.is_empty() {
            return Err(InfoFlowError::Config("Ollama host must not be empty".to_string()).into());
        }

        if !self.provider.ollama.host.starts_with("http://")
            && !self.provider.ollama.host.starts_with("https://")
        {
            return Err(InfoFlowError::Config(format!(
                "Ollama host must be an http(s) URL: {}",
                self.provider.ollama.host
            ))
            .into());
        }

        if self.provider.ollama.model.is_empty() {
            return Err(InfoFlowError::Config("Ollama model must not be empty".to_string()).into());
        }

        if self.provider.ollama.timeout_seconds == 0 {
            return Err(
                InfoFlowError::Config("Provider timeout must be positive".to_string()).into(),
            );
        }

        if self.speech.enabled && self.speech.synthesizer_command.is_empty() {
            return Err(InfoFlowError::Config(
                "Speech is enabled but synthesizer_command is empty".to_string(),
            )
            .into());
        }

        if self
            .speech
            .transcriber_command
            .as_ref()
            .is_some_and(|c| c.is_empty())
        {
            return Err(InfoFlowError::Config(
                "speech.transcriber_command must not be an empty list".to_string(),
            )
            .into());
        }

        if self.speech.capture_timeout_seconds == 0 {
            return Err(
                InfoFlowError::Config("Voice capture timeout must be positive".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            store: StoreConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.provider.ollama.model, "tinyllama");
        assert_eq!(config.provider.ollama.host, "http://localhost:11434");
        assert_eq!(config.speech.capture_timeout_seconds, 5);
    }

    #[test]
    fn test_parse_minimal_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("provider:\n  type: ollama\n").unwrap();
        assert_eq!(config.provider.ollama.host, "http://localhost:11434");
        assert!(config.speech.enabled);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
provider:
  type: ollama
  ollama:
    host: http://gpu-box:11434
    model: llama3.2:latest
    timeout_seconds: 60
store:
  path: /tmp/sessions.json
speech:
  enabled: false
  synthesizer_command: ["say"]
  transcriber_command: ["my-stt", "--once"]
  capture_timeout_seconds: 10
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.ollama.host, "http://gpu-box:11434");
        assert_eq!(config.provider.ollama.model, "llama3.2:latest");
        assert_eq!(config.provider.ollama.timeout_seconds, 60);
        assert_eq!(config.store.path.as_deref(), Some("/tmp/sessions.json"));
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.synthesizer_command, vec!["say".to_string()]);
        assert_eq!(
            config.speech.transcriber_command,
            Some(vec!["my-stt".to_string(), "--once".to_string()])
        );
        assert_eq!(config.speech.capture_timeout_seconds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "copilot".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.provider.ollama.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_host() {
        let mut config = Config::default();
        config.provider.ollama.host = "localhost:11434".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.provider.ollama.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.speech.capture_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_enabled_speech_without_command() {
        let mut config = Config::default();
        config.speech.synthesizer_command.clear();
        assert!(config.validate().is_err());

        // Disabled speech does not need a command
        config.speech.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_transcriber_list() {
        let mut config = Config::default();
        config.speech.transcriber_command = Some(Vec::new());
        assert!(config.validate().is_err());

        config.speech.transcriber_command = Some(vec!["my-stt".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides_applied() {
        std::env::set_var("INFOFLOW_OLLAMA_HOST", "http://env-host:11434");
        std::env::set_var("INFOFLOW_OLLAMA_MODEL", "env-model");
        std::env::set_var("INFOFLOW_SPEECH_ENABLED", "off");

        let cli = crate::cli::Cli::default();
        let config = Config::load("does-not-exist.yaml", &cli).unwrap();
        assert_eq!(config.provider.ollama.host, "http://env-host:11434");
        assert_eq!(config.provider.ollama.model, "env-model");
        assert!(!config.speech.enabled);

        std::env::remove_var("INFOFLOW_OLLAMA_HOST");
        std::env::remove_var("INFOFLOW_OLLAMA_MODEL");
        std::env::remove_var("INFOFLOW_SPEECH_ENABLED");
    }

    #[test]
    #[serial]
    fn test_cli_sessions_file_override_wins() {
        let mut cli = crate::cli::Cli::default();
        cli.sessions_file = Some("/tmp/override.json".to_string());

        let config = Config::load("does-not-exist.yaml", &cli).unwrap();
        assert_eq!(config.store.path.as_deref(), Some("/tmp/override.json"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cli = crate::cli::Cli::default();
        let config = Config::load("nope/definitely-missing.yaml", &cli).unwrap();
        assert_eq!(config.provider.provider_type, "ollama");
    }
}
