//! Submission orchestration.
//!
//! State machine per attempt:
//!
//! ```text
//! paid ──resolve──build──create_shipment──┬─ success ──► label_ready / submitted (+ notify)
//!                                         └─ rejection or fault ──► paid / failed (+ carrier_errors)
//! ```
//!
//! The attempt runs exactly once per trigger. Carrier shipment creation is
//! not idempotent, so nothing here retries automatically; a failed shipment
//! stays `paid` with a classified, retry-flagged error record, and
//! resubmission is an explicit operator action through [`SubmissionService::submit`].

use std::sync::Arc;

use chrono::{Days, Utc};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info, warn};

use shipping_common::carrier::{resolve_carrier, GatewayFactory};
use shipping_common::error::{classify, classify_with_details, ClassifiedError};
use shipping_common::request::{build_request, BuildInputs};
use shipping_common::shipment::{Address, CarrierErrorRecord, ShipmentId};

use crate::config::SubmissionSettings;
use crate::notify::{LabelReadyNotification, ShipmentNotifier};
use crate::storage::{ShipmentStore, StoreError, SubmissionRecord, SuccessRecord};

/// Infrastructure failures that prevent an attempt from reaching a
/// carrier-classified outcome (the store is unreachable, or a terminal
/// write failed). Carrier rejections and transport faults are NOT errors
/// here; they are [`SubmissionOutcome::Failed`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("Shipment store error: {0}")]
    Store(#[from] StoreError),
}

/// Terminal result of one submission attempt.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Carrier accepted the shipment; label is ready
    Submitted { tracking_number: String },
    /// Attempt failed; the shipment stays `paid` with this persisted record
    Failed { error: CarrierErrorRecord },
    /// The shipment was no longer awaiting submission; nothing was sent to
    /// any carrier
    AlreadySubmitted,
}

/// The submission orchestrator.
pub struct SubmissionService {
    store: Arc<dyn ShipmentStore>,
    gateways: Arc<dyn GatewayFactory>,
    notifier: Arc<dyn ShipmentNotifier>,
    sender: Address,
    settings: SubmissionSettings,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn ShipmentStore>,
        gateways: Arc<dyn GatewayFactory>,
        notifier: Arc<dyn ShipmentNotifier>,
        sender: Address,
        settings: SubmissionSettings,
    ) -> Self {
        Self {
            store,
            gateways,
            notifier,
            sender,
            settings,
        }
    }

    /// Public entry point: run one submission attempt for a shipment.
    ///
    /// Every path out of here leaves the shipment in a consistent terminal
    /// state for this attempt. Unexpected infrastructure errors write a
    /// generic `system_error` record before propagating, so no failure is
    /// ever silently dropped.
    pub async fn submit(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        info!(shipment = %shipment_id, "starting carrier submission");

        let record = self.store.load_for_submission(shipment_id).await?;

        if !record.shipment.awaiting_submission() {
            info!(
                shipment = %shipment_id,
                status = %record.shipment.status,
                "shipment is not awaiting submission, skipping"
            );
            return Ok(SubmissionOutcome::AlreadySubmitted);
        }

        match self.run_attempt(&record).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                // Terminal backstop: the attempt died before a specific
                // classification could be persisted.
                error!(shipment = %shipment_id, %err, "submission attempt aborted");
                let backstop =
                    CarrierErrorRecord::from(ClassifiedError::system(err.to_string()));
                if let Err(write_err) = self.store.record_failure(shipment_id, &backstop).await {
                    error!(
                        shipment = %shipment_id,
                        %write_err,
                        "failed to persist terminal failure record"
                    );
                }
                Err(err)
            }
        }
    }

    async fn run_attempt(
        &self,
        record: &SubmissionRecord,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let shipment_id = record.shipment.id;

        // Resolve the carrier; configuration problems are business-terminal,
        // not worth offering to any carrier.
        let resolved = match resolve_carrier(&record.shipment, record.carrier_service.as_ref()) {
            Ok(resolved) => resolved,
            Err(err) => {
                return self
                    .fail(shipment_id, ClassifiedError::system(err.to_string()))
                    .await;
            }
        };

        let gateway = match self.gateways.create(resolved.code) {
            Ok(gateway) => gateway,
            Err(err) => {
                return self
                    .fail(shipment_id, ClassifiedError::system(err.to_string()))
                    .await;
            }
        };

        let ship_date = Utc::now().date_naive()
            + Days::new(u64::from(self.settings.ship_date_offset_days));

        let request = match build_request(BuildInputs {
            shipment: &record.shipment,
            packages: &record.packages,
            recipient: &record.recipient,
            sender: &self.sender,
            service_code: &resolved.service_code,
            ship_date,
            precision: self.settings.measure_precision,
        }) {
            Ok(request) => request,
            Err(err) => {
                return self
                    .fail(shipment_id, ClassifiedError::system(err.to_string()))
                    .await;
            }
        };

        info!(
            shipment = %shipment_id,
            carrier = %resolved.code,
            service = %resolved.service_code,
            packages = request.packages.len(),
            "submitting to carrier"
        );

        // The single bounded carrier call. A timeout here is
        // indistinguishable from any other transport fault: we do not know
        // whether the carrier created the shipment, so the attempt ends.
        let result = match timeout(
            self.settings.attempt_timeout(),
            gateway.create_shipment(&request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(shipping_common::carrier::CarrierError::Timeout(format!(
                "attempt exceeded {}ms",
                self.settings.attempt_timeout_ms
            ))),
        };

        match result {
            Ok(response) if response.success => match response.tracking_number.clone() {
                Some(tracking_number) => {
                    self.succeed(record, &resolved, tracking_number, response.labels)
                        .await
                }
                None => {
                    self.fail(
                        shipment_id,
                        classify("carrier reported success without a tracking number"),
                    )
                    .await
                }
            },
            Ok(response) => {
                let raw = response.error_message.clone().unwrap_or_default();
                let classified = classify_with_details(&raw, response.detail_strings());
                self.fail(shipment_id, classified).await
            }
            Err(fault) => {
                let classified = classify(&fault.to_string());
                self.fail(shipment_id, classified).await
            }
        }
    }

    async fn succeed(
        &self,
        record: &SubmissionRecord,
        resolved: &shipping_common::carrier::ResolvedCarrier,
        tracking_number: String,
        labels: Vec<shipping_common::shipment::LabelArtifact>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let shipment_id = record.shipment.id;
        let outcome = SuccessRecord {
            tracking_number: tracking_number.clone(),
            carrier_name: resolved.code.display_name().to_string(),
            service_type: resolved.service_code.clone(),
            labels,
        };

        self.store.record_success(shipment_id, &outcome).await?;

        info!(
            shipment = %shipment_id,
            tracking_number = %tracking_number,
            carrier = %resolved.code,
            "shipment submitted, label ready"
        );

        // Best-effort side effect: the successful state is already durable
        // and a notification failure must not disturb it.
        let notification = LabelReadyNotification {
            shipment_id,
            reference: record.shipment.reference.clone(),
            customer_email: record.customer.email.clone(),
            customer_name: record.customer.full_name.clone(),
            carrier_name: outcome.carrier_name.clone(),
            tracking_number: tracking_number.clone(),
        };
        if let Err(err) = self.notifier.label_ready(&notification).await {
            warn!(shipment = %shipment_id, %err, "label-ready notification failed");
        }

        Ok(SubmissionOutcome::Submitted { tracking_number })
    }

    async fn fail(
        &self,
        shipment_id: ShipmentId,
        classified: ClassifiedError,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let record = CarrierErrorRecord::from(classified);

        warn!(
            shipment = %shipment_id,
            category = %record.error_category,
            can_retry = record.can_retry,
            "submission failed: {}",
            record.raw_message
        );

        self.store.record_failure(shipment_id, &record).await?;

        Ok(SubmissionOutcome::Failed { error: record })
    }
}
