use std::env;

use thiserror::Error;

use crate::llm::GroqGatewayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub groq: GroqGatewayConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {key}: {value}")]
    ParseInt { key: String, value: String },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build provider http client: {0}")]
    HttpClient(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl CoachConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            groq: GroqGatewayConfig::from_env()?,
            log_format: log_format_from_env()?,
        })
    }
}

/// Loads a `.env` file from the working directory tree when one exists.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

pub fn log_format_from_env() -> Result<LogFormat, ConfigError> {
    parse_log_format(optional_trimmed_env("LOG_FORMAT").as_deref())
}

fn parse_log_format(value: Option<&str>) -> Result<LogFormat, ConfigError> {
    match value {
        None => Ok(LogFormat::Text),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidConfiguration(format!(
                "LOG_FORMAT must be text or json, got '{value}'"
            ))),
        },
    }
}

pub(crate) fn require_non_empty_env(key: &str) -> Result<String, ConfigError> {
    optional_trimmed_env(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()))
}

pub(crate) fn parse_optional_u64_env(key: &str) -> Result<Option<u64>, ConfigError> {
    optional_trimmed_env(key)
        .map(|value| {
            value
                .parse::<u64>()
                .map_err(|_| ConfigError::ParseInt {
                    key: key.to_string(),
                    value,
                })
        })
        .transpose()
}

pub(crate) fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
