//! Configuration file management for say2text.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory and created with
//! defaults on first run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the configured server base URL.
pub const SERVER_URL_ENV: &str = "SAY2TEXT_SERVER_URL";

/// Transcription server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the Say2Text server REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Bounds how long an upload can hang
    /// before it is reported as failed.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Audio recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `say2text list-devices`
    /// - device name from `say2text list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Recording sample rate in Hz (16000 recommended for speech recognition)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Say2TextConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl Say2TextConfig {
    /// Loads configuration from the user's config directory, writing a
    /// default file on first run.
    ///
    /// The `SAY2TEXT_SERVER_URL` environment variable, when set, overrides
    /// the configured server base URL.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;

        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(&config_path)?;
            toml::from_str(&config_content)
                .map_err(|e| anyhow::anyhow!("Malformed config file: {e}"))?
        } else {
            let config = Say2TextConfig::default();
            config.save()?;
            tracing::info!("Created default config at {}", config_path.display());
            config
        };

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Server base URL overridden by {SERVER_URL_ENV}");
                config.server.base_url = url;
            }
        }

        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("say2text");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("say2text.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Say2TextConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5000/api");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.audio.device, "default");
        assert_eq!(config.audio.sample_rate, 16000);
    }

    #[test]
    fn partial_toml_fills_in_missing_fields() {
        let config: Say2TextConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://transcribe.example.com/api"

            [audio]
            sample_rate = 44100
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "https://transcribe.example.com/api");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.device, "default");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut config = Say2TextConfig::default();
        config.audio.device = "1".to_string();
        config.server.request_timeout_secs = 30;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let loaded: Say2TextConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(loaded.audio.device, "1");
        assert_eq!(loaded.server.request_timeout_secs, 30);
    }
}
