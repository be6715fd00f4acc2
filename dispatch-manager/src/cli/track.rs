//! `track` command: tracking lookup through a carrier gateway.

use anyhow::{anyhow, Context, Result};
use clap::Args;

use shipping_common::carrier::{CarrierCode, CarrierGatewayFactory, GatewayFactory};

use crate::config::Settings;

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Carrier code: dhl, fedex, ups, myus
    pub carrier: String,
    /// Carrier tracking number
    pub tracking_number: String,
}

pub async fn execute(args: TrackArgs) -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;

    let code = CarrierCode::parse(&args.carrier)
        .ok_or_else(|| anyhow!("unknown carrier '{}'", args.carrier))?;

    let factory = CarrierGatewayFactory::new(settings.carriers.clone());
    let gateway = factory.create(code)?;

    let tracking = gateway.track(&args.tracking_number).await?;

    println!("Tracking {} via {}", tracking.tracking_number, code.display_name());
    if let Some(status) = &tracking.status {
        println!("Status: {status}");
    }
    if let Some(eta) = tracking.estimated_delivery {
        println!("Estimated delivery: {eta}");
    }
    for event in &tracking.events {
        match &event.location {
            Some(location) => println!("  {} ({})", event.description, location),
            None => println!("  {}", event.description),
        }
    }

    Ok(())
}
