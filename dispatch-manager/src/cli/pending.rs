//! `pending` command: paid shipments with no carrier submission yet.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Settings;
use crate::storage::{PgShipmentRepository, ShipmentStore};

#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Maximum number of shipments to list
    #[arg(long, default_value_t = 50)]
    pub limit: i64,
}

pub async fn execute(args: PendingArgs) -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    let repository = PgShipmentRepository::from_settings(&settings.database)
        .await
        .context("connecting to database")?;

    let pending = repository.find_pending(args.limit).await?;

    if pending.is_empty() {
        println!("No shipments awaiting submission.");
        return Ok(());
    }

    println!("{} shipment(s) awaiting submission:", pending.len());
    for id in pending {
        println!("  {id}");
    }

    Ok(())
}
