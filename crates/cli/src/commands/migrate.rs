//! Database migration command.
//!
//! Applies the ledger schema from `crates/cart/migrations/`.
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string for the ledger

use thiserror::Error;

use quince_cart::LedgerConfig;
use quince_cart::store::create_pool;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("configuration error: {0}")]
    Config(#[from] quince_cart::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Run the ledger migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing or the database
/// cannot be reached.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let config = LedgerConfig::from_env()?;

    tracing::info!("Connecting to ledger database...");
    let pool = create_pool(&config.database_url, config.max_connections).await?;

    tracing::info!("Running ledger migrations...");
    sqlx::migrate!("../cart/migrations").run(&pool).await?;

    tracing::info!("Ledger migrations complete!");
    Ok(())
}
