//! Quince CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run ledger database migrations
//! quince migrate
//!
//! # Check ledger connectivity
//! quince ping
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quince")]
#[command(author, version, about = "Quince CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run ledger database migrations
    Migrate,
    /// Verify the ledger database is reachable
    Ping,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Ping => commands::ping::run().await?,
    }
    Ok(())
}
