//! Application configuration module
//!
//! Provides the configuration types for the feed/chat client: endpoint URLs,
//! page size, storage location and request timeout. Values come from
//! defaults, an optional TOML file, then environment overrides.

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default identity/listing API
pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";
/// Default echo socket
pub const DEFAULT_CHAT_URL: &str = "wss://echo.websocket.org/.ws";
/// Default number of items per feed page
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL for `/auth/*` and `/posts`
    pub api_base_url: String,
    /// Websocket URL for the chat channel
    pub chat_url: String,
    /// Items requested per feed page
    pub page_limit: u32,
    /// Directory holding persisted session entries
    pub storage_dir: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            storage_dir: default_storage_dir(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api = Url::parse(&self.api_base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api_base_url.clone()))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(self.api_base_url.clone()));
        }

        let chat = Url::parse(&self.chat_url)
            .map_err(|_| ConfigError::InvalidUrl(self.chat_url.clone()))?;
        if !matches!(chat.scheme(), "ws" | "wss") {
            return Err(ConfigError::InvalidUrl(self.chat_url.clone()));
        }

        if self.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_limit",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Load configuration: defaults, then `path` (if given), then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = match path {
            Some(path) => AppConfigBuilder::from_toml_file(path)?,
            None => AppConfigBuilder::default(),
        };
        builder = builder.with_env_overrides()?;
        builder.build()
    }
}

/// File layout accepted by [`AppConfigBuilder::from_toml_str`]
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    chat_url: Option<String>,
    page_limit: Option<u32>,
    storage_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_base_url: Option<String>,
    chat_url: Option<String>,
    page_limit: Option<u32>,
    storage_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the chat websocket URL
    pub fn chat_url(mut self, url: impl Into<String>) -> Self {
        self.chat_url = Some(url.into());
        self
    }

    /// Set the feed page size
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Set the session storage directory
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Seed a builder from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self {
            api_base_url: file.api_base_url,
            chat_url: file.chat_url,
            page_limit: file.page_limit,
            storage_dir: file.storage_dir,
            request_timeout_secs: file.request_timeout_secs,
        })
    }

    /// Seed a builder from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Apply `FEEDCHAT_*` environment variables on top of the current values
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("FEEDCHAT_API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(url) = lookup("FEEDCHAT_CHAT_URL") {
            self.chat_url = Some(url);
        }
        if let Some(raw) = lookup("FEEDCHAT_PAGE_LIMIT") {
            let limit = raw.trim().parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                field: "page_limit",
                message: format!("not a number: {}", raw),
            })?;
            self.page_limit = Some(limit);
        }
        if let Some(dir) = lookup("FEEDCHAT_STORAGE_DIR") {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_base_url: self
                .api_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            chat_url: self.chat_url.unwrap_or(defaults.chat_url),
            page_limit: self.page_limit.unwrap_or(defaults.page_limit),
            storage_dir: self.storage_dir.unwrap_or(defaults.storage_dir),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedchat")
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to read config: {0}")]
    Io(String),
}
