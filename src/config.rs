//! Configuration.
//!
//! Two layers:
//! - [`ApiConfig`] is the runtime setting the pipeline needs (response
//!   format, base URLs). It is passed explicitly to [`crate::LastFmClient`].
//! - [`Config`] is the on-disk file used by the binary, stored in the
//!   OS-standard config directory:
//!   - Windows: %APPDATA%\lastfm-api\config.toml
//!   - macOS: ~/Library/Application Support/lastfm-api/config.toml
//!   - Linux: ~/.config/lastfm-api/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::credentials::Credentials;

/// Plain endpoint, used for unsigned GET calls.
pub const DEFAULT_API_BASE: &str = "http://ws.audioscrobbler.com/2.0/";

/// Secure endpoint, used for signed POST calls.
pub const DEFAULT_SECURE_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

/// How the service should render responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Xml,
    Json,
}

impl ResponseFormat {
    /// Value for the `format` query parameter, if one must be sent.
    ///
    /// XML is the service default and is never requested explicitly.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Xml => None,
            Self::Json => Some("json"),
        }
    }
}

/// Runtime settings for the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Response rendering requested from the service
    pub format: ResponseFormat,
    /// Base URL for unsigned GET calls
    pub api_base: String,
    /// Base URL for signed POST calls
    pub secure_api_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            format: ResponseFormat::Xml,
            api_base: DEFAULT_API_BASE.to_string(),
            secure_api_base: DEFAULT_SECURE_API_BASE.to_string(),
        }
    }
}

impl ApiConfig {
    /// Point both endpoints at the same base URL (test servers, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            format: ResponseFormat::Xml,
            api_base: base_url.clone(),
            secure_api_base: base_url,
        }
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

/// Application configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Endpoint and format settings
    pub api: ApiConfig,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lastfm-api"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to an explicit path
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[api]"));
        assert!(toml.contains("format = \"xml\""));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[credentials]
api_key = "my-key"

[api]
format = "json"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.credentials.api_key, "my-key");
        assert!(config.credentials.session_key.is_empty());
        assert_eq!(config.api.format, ResponseFormat::Json);
        assert_eq!(config.api.api_base, DEFAULT_API_BASE);
        assert_eq!(config.api.secure_api_base, DEFAULT_SECURE_API_BASE);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.credentials = Credentials::new("key", "secret").with_session_key("sk");
        config.api.format = ResponseFormat::Json;

        save_to(&config, &path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_invalid_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(load_from(&path), Config::default());

        std::fs::write(&path, "this is [not toml").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_format_query_value() {
        assert_eq!(ResponseFormat::Xml.query_value(), None);
        assert_eq!(ResponseFormat::Json.query_value(), Some("json"));
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://localhost:8080/").format(ResponseFormat::Json);
        assert_eq!(api.api_base, "http://localhost:8080/");
        assert_eq!(api.secure_api_base, "http://localhost:8080/");
        assert_eq!(api.format, ResponseFormat::Json);
    }
}
