//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development. The `BACKEND_MODE` variable is
//! the backend selector: it is read exactly once here, and the binary builds
//! exactly one backend implementation from it. Call sites never branch on it.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which backend implementation the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Postgres plus the real video provider.
    Live,
    /// In-memory seeded data, process-lifetime only.
    Demo,
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(BackendMode::Live),
            "demo" => Ok(BackendMode::Demo),
            other => Err(format!("'{}' is not a valid backend mode", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub backend: BackendMode,
    /// Required in live mode, unused in demo mode.
    pub database_url: Option<String>,
    pub log_level: Level,
    /// Artificial latency applied by the demo backend so loading states
    /// behave like they do against the network.
    pub demo_latency: Duration,
    pub bunny_library_id: Option<String>,
    pub bunny_api_key: Option<String>,
    pub bunny_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Backend Selection ---
        let backend_str = std::env::var("BACKEND_MODE").unwrap_or_else(|_| "live".to_string());
        let backend = backend_str
            .parse::<BackendMode>()
            .map_err(|e| ConfigError::InvalidValue("BACKEND_MODE".to_string(), e))?;

        // The database is only required when we actually talk to it. There
        // are deliberately no hardcoded connection fallbacks.
        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == BackendMode::Live && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let demo_latency_ms = match std::env::var("DEMO_LATENCY_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("DEMO_LATENCY_MS".to_string(), e.to_string())
            })?,
            Err(_) => 400,
        };

        // --- Video Provider Settings ---
        let bunny_library_id = std::env::var("BUNNY_LIBRARY_ID").ok();
        let bunny_api_key = std::env::var("BUNNY_API_KEY").ok();
        let bunny_base_url = std::env::var("BUNNY_BASE_URL")
            .unwrap_or_else(|_| "https://video.bunnycdn.com".to_string());
        if backend == BackendMode::Live {
            if bunny_library_id.is_none() {
                return Err(ConfigError::MissingVar("BUNNY_LIBRARY_ID".to_string()));
            }
            if bunny_api_key.is_none() {
                return Err(ConfigError::MissingVar("BUNNY_API_KEY".to_string()));
            }
        }

        Ok(Self {
            bind_address,
            backend,
            database_url,
            log_level,
            demo_latency: Duration::from_millis(demo_latency_ms),
            bunny_library_id,
            bunny_api_key,
            bunny_base_url,
        })
    }
}
