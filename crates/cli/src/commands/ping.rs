//! Ledger connectivity check.

use thiserror::Error;

use quince_cart::LedgerConfig;
use quince_cart::store::create_pool;

/// Errors that can occur while pinging the ledger.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("configuration error: {0}")]
    Config(#[from] quince_cart::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the ledger and run a trivial query.
///
/// # Errors
///
/// Returns `PingError` if configuration is missing or the database cannot
/// be reached.
pub async fn run() -> Result<(), PingError> {
    dotenvy::dotenv().ok();

    let config = LedgerConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.max_connections).await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!("Ledger database is reachable");
    Ok(())
}
