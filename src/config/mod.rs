//! Application settings loaded from the environment.
//!
//! Credentials are required; everything else has a sensible default for
//! the public futures testnet. A `.env` file is honored when present
//! (loaded by the entrypoint before settings are read).

use std::env;

use thiserror::Error;

use crate::exchanges::binance::TESTNET_BASE_URL;

/// Default SQLite database file.
const DEFAULT_DATABASE_PATH: &str = "trading_bot.db";

/// Default HTTP listen address for serve mode.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BINANCE_API_KEY and BINANCE_API_SECRET must be set")]
    MissingCredentials,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Exchange API key.
    pub api_key: String,
    /// Exchange API secret.
    pub api_secret: String,
    /// Exchange REST base URL (testnet by default).
    pub base_url: String,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Listen address for the HTTP API.
    pub bind_addr: String,
    /// Logging verbosity: "debug", "info", "warn", "error".
    pub log_level: Option<String>,
}

impl Settings {
    /// Load settings from environment variables:
    /// - `BINANCE_API_KEY`, `BINANCE_API_SECRET` (required)
    /// - `BINANCE_FUTURES_TESTNET_URL` (default: public testnet host)
    /// - `DATABASE_PATH`, `BIND_ADDR`, `LOG_LEVEL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_var("BINANCE_API_KEY");
        let api_secret = non_empty_var("BINANCE_API_SECRET");

        let (Some(api_key), Some(api_secret)) = (api_key, api_secret) else {
            return Err(ConfigError::MissingCredentials);
        };

        Ok(Self {
            api_key,
            api_secret,
            base_url: non_empty_var("BINANCE_FUTURES_TESTNET_URL")
                .unwrap_or_else(|| TESTNET_BASE_URL.to_string()),
            database_path: non_empty_var("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            bind_addr: non_empty_var("BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_level: non_empty_var("LOG_LEVEL"),
        })
    }
}

/// Reads an environment variable, treating empty values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests;
