//! Startup configuration from the environment

use crate::generation::FlowConfig;
use reqwest::Url;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_FLOW_API_URL: &str = "https://example.com/generate";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
/// Longest long-poll the Bot API honours
const MAX_POLL_TIMEOUT_SECS: u64 = 50;
const DEFAULT_FLOW_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FLOW_CONNECT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} is not a valid http(s) URL: {value:?}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("{name} must be at most {max}, got {value}")]
    OutOfRange { name: &'static str, value: u64, max: u64 },
    #[error("FORM_BIND_ADDR is not a socket address: {0:?}")]
    InvalidAddr(String),
    #[error("FLOW_CONNECT_TIMEOUT_SECS ({connect}) must be below FLOW_TIMEOUT_SECS ({total})")]
    ConnectTimeoutTooLong { connect: u64, total: u64 },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub telegram_api_url: String,
    pub poll_timeout_secs: u64,
    pub flow_api_url: String,
    pub flow_api_key: Option<String>,
    pub flow_timeout: Duration,
    pub flow_connect_timeout: Duration,
    /// Where the choice form is hosted; enables the "open form" keyboard
    pub webapp_url: Option<String>,
    /// Bind address for serving the form page ourselves
    pub form_bind_addr: Option<SocketAddr>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let telegram_api_url = url_var(
            "TELEGRAM_API_URL",
            get("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        )?;
        let flow_api_url = url_var(
            "FLOW_API_URL",
            get("FLOW_API_URL").unwrap_or_else(|| DEFAULT_FLOW_API_URL.to_string()),
        )?;
        let webapp_url = get("WEBAPP_URL")
            .map(|value| url_var("WEBAPP_URL", value))
            .transpose()?;

        let poll_timeout_secs = secs_var("POLL_TIMEOUT_SECS", get("POLL_TIMEOUT_SECS"), DEFAULT_POLL_TIMEOUT_SECS)?;
        if poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(ConfigError::OutOfRange {
                name: "POLL_TIMEOUT_SECS",
                value: poll_timeout_secs,
                max: MAX_POLL_TIMEOUT_SECS,
            });
        }
        let total = secs_var("FLOW_TIMEOUT_SECS", get("FLOW_TIMEOUT_SECS"), DEFAULT_FLOW_TIMEOUT_SECS)?;
        let connect = secs_var(
            "FLOW_CONNECT_TIMEOUT_SECS",
            get("FLOW_CONNECT_TIMEOUT_SECS"),
            DEFAULT_FLOW_CONNECT_TIMEOUT_SECS,
        )?;
        if connect >= total {
            return Err(ConfigError::ConnectTimeoutTooLong { connect, total });
        }

        let form_bind_addr = get("FORM_BIND_ADDR")
            .map(|value| value.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidAddr(value)))
            .transpose()?;

        Ok(Self {
            bot_token,
            telegram_api_url,
            poll_timeout_secs,
            flow_api_url,
            flow_api_key: get("FLOW_API_KEY"),
            flow_timeout: Duration::from_secs(total),
            flow_connect_timeout: Duration::from_secs(connect),
            webapp_url,
            form_bind_addr,
        })
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            url: self.flow_api_url.clone(),
            api_key: self.flow_api_key.clone(),
            timeout: self.flow_timeout,
            connect_timeout: self.flow_connect_timeout,
        }
    }
}

fn url_var(name: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidUrl { name, value }),
    }
}

fn secs_var(name: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
