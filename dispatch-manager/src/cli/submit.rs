//! `submit` command: one submission attempt for one shipment.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use shipping_common::carrier::CarrierGatewayFactory;
use shipping_common::shipment::ShipmentId;

use crate::config::Settings;
use crate::notify::WebhookNotifier;
use crate::storage::PgShipmentRepository;
use crate::submission::{SubmissionOutcome, SubmissionService};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Shipment identifier
    pub shipment_id: Uuid,
}

pub async fn execute(args: SubmitArgs) -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;

    let repository = PgShipmentRepository::from_settings(&settings.database)
        .await
        .context("connecting to database")?;
    let factory = CarrierGatewayFactory::new(settings.carriers.clone());
    let notifier =
        WebhookNotifier::from_settings(&settings.notification).context("building notifier")?;

    let service = SubmissionService::new(
        Arc::new(repository),
        Arc::new(factory),
        Arc::new(notifier),
        settings.warehouse.address(),
        settings.submission.clone(),
    );

    match service.submit(ShipmentId::from(args.shipment_id)).await? {
        SubmissionOutcome::Submitted { tracking_number } => {
            println!("Label ready. Tracking number: {tracking_number}");
        }
        SubmissionOutcome::Failed { error } => {
            println!("Submission failed ({}): {}", error.error_category, error.message);
            if !error.raw_message.is_empty() {
                println!("Carrier said: {}", error.raw_message);
            }
            for detail in &error.details {
                println!("  - {detail}");
            }
            if error.can_retry {
                println!("This failure is retryable; run submit again once resolved.");
            }
        }
        SubmissionOutcome::AlreadySubmitted => {
            println!("Shipment is not awaiting submission; nothing sent.");
        }
    }

    Ok(())
}
