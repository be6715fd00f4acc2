//! Shipment persistence.
//!
//! [`ShipmentStore`] is the port the orchestrator drives; the production
//! implementation is [`PgShipmentRepository`] over Postgres. The
//! orchestrator's writes are limited to the carrier outcome fields: it never
//! touches payment, customer, or package data.

mod repository;

use async_trait::async_trait;

use shipping_common::shipment::{
    Address, CarrierErrorRecord, CarrierService, Customer, LabelArtifact, Package, Shipment,
    ShipmentId,
};

pub use repository::{PgShipmentRepository, StoreError, StoreResult};

/// Everything one submission attempt needs, loaded eagerly in one read.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub shipment: Shipment,
    pub packages: Vec<Package>,
    /// The customer's chosen delivery address
    pub recipient: Address,
    pub customer: Customer,
    /// Present when the shipment references a structured carrier service
    pub carrier_service: Option<CarrierService>,
}

/// Terminal success fields persisted after a carrier accepts a shipment.
#[derive(Debug, Clone)]
pub struct SuccessRecord {
    pub tracking_number: String,
    pub carrier_name: String,
    pub service_type: String,
    pub labels: Vec<LabelArtifact>,
}

/// Persistence port for the submission orchestrator.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Load a shipment with packages, items, recipient address, customer,
    /// and the optional carrier service record.
    async fn load_for_submission(&self, id: ShipmentId) -> StoreResult<SubmissionRecord>;

    /// Persist a successful submission: tracking number, carrier, service,
    /// labels, `carrier_status = submitted`, `status = label_ready`, and
    /// clear any prior carrier errors.
    ///
    /// Guarded on the shipment still being `paid`; a concurrent writer
    /// surfaces as [`StoreError::Conflict`].
    async fn record_success(&self, id: ShipmentId, outcome: &SuccessRecord) -> StoreResult<()>;

    /// Persist a failed submission: structured `carrier_errors`,
    /// `carrier_status = failed`; `status` stays `paid`.
    ///
    /// Guarded on the shipment being `paid` with no tracking number, which
    /// keeps the tracking-xor-failed invariant intact.
    async fn record_failure(&self, id: ShipmentId, error: &CarrierErrorRecord) -> StoreResult<()>;

    /// Paid shipments with no carrier submission yet, oldest first.
    async fn find_pending(&self, limit: i64) -> StoreResult<Vec<ShipmentId>>;
}
