//! Dispatch Manager CLI
//!
//! Provides commands for:
//! - `submit`: run one carrier submission attempt for a shipment
//! - `pending`: list paid shipments awaiting submission
//! - `track`: look up carrier tracking for a tracking number

use anyhow::Result;
use clap::Parser;

use dispatch_manager::cli::{Cli, Commands};
use shipping_common::logging::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging(LogConfig::from_env()).map_err(|e| anyhow::anyhow!(e))?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Submit(args) => {
            dispatch_manager::cli::submit::execute(args).await?;
        }
        Commands::Pending(args) => {
            dispatch_manager::cli::pending::execute(args).await?;
        }
        Commands::Track(args) => {
            dispatch_manager::cli::track::execute(args).await?;
        }
    }

    Ok(())
}
