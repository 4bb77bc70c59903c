//! Configuration management for ReelGraph Engine
//!
//! Provides strongly-typed configuration with validation, environment variable parsing,
//! and sensible defaults. Nothing here is required: an empty environment yields a
//! working local setup.
//!
//! # Example
//! ```no_run
//! use reelgraph::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Listening on {}:{}", config.api.host, config.api.port);
//! ```

use crate::error::{Error, Result};
use crate::social::feed::{DEFAULT_SLOW_THRESHOLD, DEFAULT_SLOW_THRESHOLD_MS};
use std::time::Duration;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,
    /// Feed and reaction configuration
    pub feed: FeedConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

/// Feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Reaction label applied when a client does not name one
    pub default_reaction: String,
    /// Feed computations slower than this are logged at warn level
    pub slow_threshold: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            request_timeout: Duration::from_secs(30),
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_reaction: crate::social::reaction::LIKE_LABEL.to_string(),
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            api: ApiConfig::from_env()?,
            feed: FeedConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(Error::InvalidConfig {
                key: "API_PORT",
                message: "port must be non-zero".into(),
            });
        }

        if self.api.request_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                key: "API_REQUEST_TIMEOUT_SECS",
                message: "request timeout must be positive".into(),
            });
        }

        if self.feed.default_reaction.trim().is_empty() {
            return Err(Error::InvalidConfig {
                key: "FEED_DEFAULT_REACTION",
                message: "default reaction label cannot be blank".into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
        info!("    Request timeout: {:?}", self.api.request_timeout);
        info!("    CORS: {}", self.api.cors_enabled);
        info!("  Feed:");
        info!("    Default reaction: {}", self.feed.default_reaction);
        info!("    Slow threshold: {:?}", self.feed.slow_threshold);
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            port: get_env_parsed_or("API_PORT", 8080)?,
            host: get_env_or("API_HOST", "0.0.0.0"),
            request_timeout: Duration::from_secs(get_env_parsed_or(
                "API_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            cors_enabled: get_env_or("API_CORS_ENABLED", "true")
                .parse()
                .unwrap_or(true),
            cors_origins: parse_origins(&get_env_or("API_CORS_ORIGINS", "*")),
        })
    }
}

impl FeedConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            default_reaction: get_env_or(
                "FEED_DEFAULT_REACTION",
                crate::social::reaction::LIKE_LABEL,
            ),
            slow_threshold: Duration::from_millis(get_env_parsed_or(
                "FEED_SLOW_THRESHOLD_MS",
                DEFAULT_SLOW_THRESHOLD_MS,
            )?),
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an optional environment variable; a present but malformed value is an error
fn get_env_parsed_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
            key,
            message: format!("Invalid value '{}': {}", value, e).into(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
