/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is layered, later sources win:
 * 1. Built-in defaults suitable for local development
 * 2. An optional TOML file named by `WANDERHUB_CONFIG`
 * 3. Environment variables (`DATABASE_URL`, `JWT_SECRET`, `SERVER_PORT`,
 *    `TYPING_TTL_SECS`, `TOKEN_TTL_HOURS`, `BCRYPT_COST`)
 *
 * # Error Handling
 *
 * Unlike optional integrations, the database is required: the relay cannot
 * accept a message it cannot persist. Configuration and connection errors
 * are returned to the caller and abort startup.
 */

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

/// Secret used when none is configured. Startup logs a warning when it is in use.
pub const DEV_JWT_SECRET: &str = "wanderhub-dev-secret-change-me";

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "WANDERHUB_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// sqlx SQLite URL, e.g. `sqlite://wanderhub.db` or `sqlite::memory:`
    pub database_url: String,
    /// HMAC secret for HS256 bearer tokens
    pub jwt_secret: String,
    /// TCP port the HTTP server binds to
    pub port: u16,
    /// Seconds a typing flag stays active without a refresh
    pub typing_ttl_secs: u64,
    /// Lifetime of issued tokens
    pub token_ttl_hours: u64,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Capacity of each room's broadcast channel
    pub broadcast_capacity: usize,
    /// How often rooms without receivers are pruned
    pub cleanup_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://wanderhub.db".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            port: 3000,
            typing_ttl_secs: 6,
            token_ttl_hours: 24 * 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            broadcast_capacity: 256,
            cleanup_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional TOML file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML text, filling unspecified keys with defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Overlay values from a key lookup (the environment, in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_env("SERVER_PORT", port)?;
        }
        if let Some(ttl) = lookup("TYPING_TTL_SECS") {
            self.typing_ttl_secs = parse_env("TYPING_TTL_SECS", ttl)?;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            self.token_ttl_hours = parse_env("TOKEN_TTL_HOURS", ttl)?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = parse_env("BCRYPT_COST", cost)?;
        }
        Ok(())
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid("database_url must not be empty".into()));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must not be empty".into()));
        }
        if self.typing_ttl_secs == 0 {
            return Err(ConfigError::Invalid("typing_ttl_secs must be at least 1".into()));
        }
        if self.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid("token_ttl_hours must be at least 1".into()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid("bcrypt_cost must be between 4 and 31".into()));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::Invalid("broadcast_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// In-memory database, fixed secret and the cheapest bcrypt cost
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            ..Self::default()
        }
    }

    pub fn typing_ttl(&self) -> Duration {
        Duration::from_secs(self.typing_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// Connect to SQLite and run the embedded migrations
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
