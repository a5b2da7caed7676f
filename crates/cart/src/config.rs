//! Ledger configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string for the ledger
//!
//! ## Optional
//! - `CART_DB_MAX_CONNECTIONS` - pool size (default: 10)

use secrecy::SecretString;
use thiserror::Error;

/// Default connection pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the Postgres ledger backend.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// `PostgreSQL` connection URL (contains password).
    pub database_url: SecretString,
    /// Connection pool size.
    pub max_connections: u32,
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `CART_DATABASE_URL` is unset.
    /// Returns `ConfigError::InvalidEnvVar` if `CART_DB_MAX_CONNECTIONS` is
    /// not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("CART_DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("CART_DATABASE_URL".to_owned()))?;
        let max_connections =
            parse_max_connections(std::env::var("CART_DB_MAX_CONNECTIONS").ok())?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            max_connections,
        })
    }
}

/// Parse the optional pool-size override.
fn parse_max_connections(raw: Option<String>) -> Result<u32, ConfigError> {
    match raw {
        None => Ok(DEFAULT_MAX_CONNECTIONS),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| ConfigError::InvalidEnvVar("CART_DB_MAX_CONNECTIONS".to_owned(), value)),
    }
}
