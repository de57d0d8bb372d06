/// Configuration management for Geo Content Service
///
/// Loads configuration from environment variables.
use anyhow::{anyhow, Context, Result};
use db_pool::DbConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SERVICE_NAME: &str = "geo-content-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database pool configuration
    pub database: DbConfig,
    /// Storage call limits
    pub storage: StorageConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upper bound on a single storage call, including pool acquire
    pub query_timeout_ms: u64,
}

impl StorageConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

// Default values
fn default_port() -> u16 {
    8085
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(anyhow!("unsupported LOG_FORMAT '{}' (expected pretty or json)", other)),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_port),
        };

        let database = DbConfig::from_env(SERVICE_NAME)
            .map_err(|e| anyhow!(e))
            .context("invalid database configuration")?;

        let storage = StorageConfig {
            query_timeout_ms: std::env::var("STORAGE_QUERY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or_else(default_query_timeout_ms),
        };

        let logging = LoggingConfig {
            format: parse_log_format(&std::env::var("LOG_FORMAT").unwrap_or_default())
                .context("invalid logging configuration")?,
        };

        Ok(Config {
            app,
            database,
            storage,
            logging,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
