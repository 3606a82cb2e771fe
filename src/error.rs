use crate::actor_framework::FrameworkError;
use thiserror::Error;

/// Errors from talking to the backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Backend answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<FrameworkError> for ApiError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ApiError::NotFound(id),
            FrameworkError::Rejected(reason) => ApiError::Rejected(reason),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
