//! Client configuration module
//!
//! Provides the configuration the client side needs to reach a server:
//! the HTTP base URL, the WebSocket URL, and the reconnect policy.

use std::time::Duration;

use thiserror::Error;

/// Default number of reconnect attempts before the client gives up
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between reconnect attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Application configuration for clients
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP base URL, e.g. `http://127.0.0.1:3000`
    pub server_url: String,
    /// WebSocket endpoint, derived from `server_url` when not set
    pub ws_url: String,
    /// How many connection attempts before giving up
    pub reconnect_attempts: u32,
    /// Fixed delay between attempts
    pub reconnect_delay: Duration,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.ws_url.clone()));
        }
        if self.reconnect_attempts == 0 {
            return Err(ConfigError::InvalidValue("reconnect_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    ws_url: Option<String>,
    reconnect_attempts: Option<u32>,
    reconnect_delay: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Override the WebSocket URL
    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into());
        self
    }

    pub fn reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = Some(attempts);
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let server_url = self
            .server_url
            .ok_or(ConfigError::MissingValue("server_url"))?
            .trim_end_matches('/')
            .to_string();
        let ws_url = match self.ws_url {
            Some(url) => url,
            None => derive_ws_url(&server_url)?,
        };

        let config = AppConfig {
            server_url,
            ws_url,
            reconnect_attempts: self.reconnect_attempts.unwrap_or(DEFAULT_RECONNECT_ATTEMPTS),
            reconnect_delay: self.reconnect_delay.unwrap_or(DEFAULT_RECONNECT_DELAY),
        };
        config.validate()?;
        Ok(config)
    }
}

fn derive_ws_url(server_url: &str) -> Result<String, ConfigError> {
    if let Some(rest) = server_url.strip_prefix("https://") {
        Ok(format!("wss://{rest}/ws"))
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        Ok(format!("ws://{rest}/ws"))
    } else {
        Err(ConfigError::InvalidUrl(server_url.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}
