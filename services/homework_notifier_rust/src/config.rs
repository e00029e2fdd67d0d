use std::env;
use std::time::Duration;

use homework_rust_core::clients::{practicum, telegram};
use thiserror::Error;

pub const PRACTICUM_TOKEN_VAR: &str = "TOKEN_PRACT";
pub const TELEGRAM_TOKEN_VAR: &str = "TOKEN_TELE_BOT";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELE_CHAT_ID";

const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Invalid {key}: {value} (expected {expected})")]
    Invalid {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    pub practicum_endpoint: String,
    pub telegram_api_base_url: String,

    pub retry_period: Duration,
    pub http_timeout: Duration,
}

// Secrets are never printed
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_base_url", &self.telegram_api_base_url)
            .field("retry_period", &self.retry_period)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// All missing credentials are reported together, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let practicum_token = credential(PRACTICUM_TOKEN_VAR);
        let telegram_token = credential(TELEGRAM_TOKEN_VAR);
        let telegram_chat_id = credential(TELEGRAM_CHAT_ID_VAR);

        let (practicum_token, telegram_token, telegram_chat_id) =
            match (practicum_token, telegram_token, telegram_chat_id) {
                (Some(p), Some(t), Some(c)) => (p, t, c),
                (p, t, c) => {
                    let missing = [
                        (PRACTICUM_TOKEN_VAR, p.is_none()),
                        (TELEGRAM_TOKEN_VAR, t.is_none()),
                        (TELEGRAM_CHAT_ID_VAR, c.is_none()),
                    ]
                    .iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(name, _)| name.to_string())
                    .collect();
                    return Err(ConfigError::MissingCredentials(missing));
                }
            };

        let practicum_endpoint = parse_url(
            "PRACTICUM_ENDPOINT",
            lookup("PRACTICUM_ENDPOINT"),
            practicum::DEFAULT_ENDPOINT,
        )?;
        let telegram_api_base_url = parse_url(
            "TELEGRAM_API_BASE_URL",
            lookup("TELEGRAM_API_BASE_URL"),
            telegram::DEFAULT_API_BASE_URL,
        )?;

        let retry_period = Duration::from_secs(parse_secs(
            "RETRY_PERIOD_SECS",
            lookup("RETRY_PERIOD_SECS"),
            DEFAULT_RETRY_PERIOD_SECS,
        )?);
        let http_timeout = Duration::from_secs(parse_secs(
            "HTTP_TIMEOUT_SECS",
            lookup("HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint,
            telegram_api_base_url,
            retry_period,
            http_timeout,
        })
    }
}

fn parse_url(key: &str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default.to_string());
    };
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
            expected: "http(s) URL",
        })
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
            expected: "positive integer seconds",
        }),
    }
}
