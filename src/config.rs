//! Desk configuration: optional TOML file, then environment overrides.
//!
//! ```toml
//! api_url = "http://localhost:8080"
//! operator = "sari"
//! request_timeout_secs = 10
//! channel_buffer = 32
//! ```

use crate::domain::Operator;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const API_URL_ENV: &str = "ORDER_DESK_API_URL";
pub const OPERATOR_ENV: &str = "ORDER_DESK_OPERATOR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    /// Base URL of the backend, without the `/api` suffix.
    pub api_url: String,
    /// Name stamped into audit columns.
    pub operator: String,
    pub request_timeout_secs: u64,
    /// Mailbox size of every actor.
    pub channel_buffer: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            operator: Operator::FALLBACK_NAME.to_string(),
            request_timeout_secs: 10,
            channel_buffer: 32,
        }
    }
}

impl DeskConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reads the file if one is given, then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `ORDER_DESK_*` overrides taken from `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(operator) = lookup(OPERATOR_ENV) {
            self.operator = operator;
        }
        self.validated()
    }

    pub fn operator(&self) -> Operator {
        Operator::new(self.operator.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: format!("expected an http(s) URL, got {:?}", self.api_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "channel_buffer",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}
