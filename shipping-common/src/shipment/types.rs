//! Core shipment records and lifecycle enums.
//!
//! Lifecycle as the submission pipeline sees it:
//!
//! ```text
//! Pending → Paid ─┬→ LabelReady → Shipped → Delivered
//!                 │      (carrier_status = Submitted)
//!                 ├→ (stays Paid, carrier_status = Failed, carrier_errors set)
//!                 └→ Cancelled
//! ```
//!
//! The submission orchestrator is the only writer of `carrier_*` fields and
//! of transitions away from `Paid`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassifiedError, ErrorCategory};

use super::ids::{CarrierServiceId, CustomerId, PackageId, ShipmentId};

/// Shipment lifecycle status. Stored as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Created, not yet paid
    Pending,
    /// Paid and eligible for carrier submission
    Paid,
    /// Carrier accepted the shipment and returned a label
    LabelReady,
    /// Physically handed to the carrier
    Shipped,
    /// Carrier confirmed delivery
    Delivered,
    /// Cancelled before submission
    Cancelled,
}

impl ShipmentStatus {
    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::Paid => "paid",
            ShipmentStatus::LabelReady => "label_ready",
            ShipmentStatus::Shipped => "shipped",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a stored name back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ShipmentStatus::Pending),
            "paid" => Some(ShipmentStatus::Paid),
            "label_ready" => Some(ShipmentStatus::LabelReady),
            "shipped" => Some(ShipmentStatus::Shipped),
            "delivered" => Some(ShipmentStatus::Delivered),
            "cancelled" => Some(ShipmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carrier-side submission status, orthogonal to [`ShipmentStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierStatus {
    /// Never submitted
    #[default]
    None,
    /// Carrier accepted the shipment
    Submitted,
    /// Last submission attempt failed
    Failed,
}

impl CarrierStatus {
    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarrierStatus::None => "none",
            CarrierStatus::Submitted => "submitted",
            CarrierStatus::Failed => "failed",
        }
    }

    /// Parse a stored name back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(CarrierStatus::None),
            "submitted" => Some(CarrierStatus::Submitted),
            "failed" => Some(CarrierStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for CarrierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted record of the last failed submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierErrorRecord {
    /// Taxonomy category
    pub error_category: ErrorCategory,
    /// Operator-facing message
    pub message: String,
    /// Raw provider text
    pub raw_message: String,
    /// Field-level details reported by the carrier
    #[serde(default)]
    pub details: Vec<String>,
    /// Whether manual resubmission may succeed
    pub can_retry: bool,
    /// When the failure was classified
    pub occurred_at: DateTime<Utc>,
}

impl From<ClassifiedError> for CarrierErrorRecord {
    fn from(err: ClassifiedError) -> Self {
        Self {
            error_category: err.category,
            message: err.message,
            raw_message: err.raw_message,
            details: err.details,
            can_retry: err.can_retry,
            occurred_at: err.classified_at,
        }
    }
}

/// A label or customs document returned by a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelArtifact {
    /// Artifact kind: "label", "customs_invoice", "receipt"
    pub kind: String,
    /// Image format: "PDF", "PNG", "ZPL"
    pub format: String,
    /// Base64-encoded document content
    pub content: String,
}

/// A paid shipment awaiting (or holding the outcome of) carrier submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub customer_id: CustomerId,
    /// Human-facing order reference, sent to carriers as the shipment reference
    pub reference: String,
    pub status: ShipmentStatus,
    pub carrier_status: CarrierStatus,
    /// Structured carrier-service selection; preferred over the legacy option
    pub carrier_service_id: Option<CarrierServiceId>,
    /// Legacy numeric shipping-option identifier, resolved only when no
    /// structured selection exists
    pub legacy_shipping_option: Option<i32>,
    /// Currency for declared values (ISO 4217)
    pub currency: String,
    pub tracking_number: Option<String>,
    /// Carrier name recorded on success
    pub carrier_name: Option<String>,
    /// Service type recorded on success
    pub service_type: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelArtifact>,
    pub carrier_errors: Option<CarrierErrorRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the carrier accepted the shipment
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Shipment {
    /// Invariant: a tracking number and a failed carrier status never
    /// coexist. Terminal writes uphold this; loads assert it.
    pub fn state_consistent(&self) -> bool {
        !(self.tracking_number.is_some() && self.carrier_status == CarrierStatus::Failed)
    }

    /// True when the shipment is eligible for a submission attempt.
    pub fn awaiting_submission(&self) -> bool {
        self.status == ShipmentStatus::Paid && self.tracking_number.is_none()
    }
}

/// A physical package within a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub shipment_id: ShipmentId,
    /// Measured gross weight, kilograms
    pub weight_kg: f64,
    /// Outer dimensions, centimetres
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub items: Vec<PackageItem>,
}

/// A line item inside a package, flattened into customs commodities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageItem {
    pub description: String,
    pub quantity: u32,
    /// Per-unit weight, kilograms
    pub weight_kg: f64,
    /// Per-unit declared value in the shipment currency
    pub unit_value: Decimal,
    /// ISO country of origin
    pub origin_country: String,
    /// Harmonized tariff code, when known
    pub hs_code: Option<String>,
}

/// A configured carrier service: which carrier, and how its API names the
/// service level we sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierService {
    pub id: CarrierServiceId,
    /// Carrier code: "dhl", "fedex", "ups", "myus"
    pub carrier_code: String,
    /// Internal service code shown to operators
    pub service_code: String,
    /// The identifier the carrier's API expects for this service
    pub api_service_code: String,
    pub display_name: String,
}

/// The customer who owns a shipment; the notification target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    pub full_name: String,
}

/// A postal address with contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub company: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// ISO country code (may be a carrier sub-code for dependent territories)
    pub country_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment() -> Shipment {
        Shipment {
            id: ShipmentId::generate(),
            customer_id: CustomerId::generate(),
            reference: "ORD-1001".to_string(),
            status: ShipmentStatus::Paid,
            carrier_status: CarrierStatus::None,
            carrier_service_id: None,
            legacy_shipping_option: None,
            currency: "USD".to_string(),
            tracking_number: None,
            carrier_name: None,
            service_type: None,
            labels: Vec::new(),
            carrier_errors: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            submitted_at: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ShipmentStatus::Pending,
            ShipmentStatus::Paid,
            ShipmentStatus::LabelReady,
            ShipmentStatus::Shipped,
            ShipmentStatus::Delivered,
            ShipmentStatus::Cancelled,
        ] {
            assert_eq!(ShipmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ShipmentStatus::parse("nope"), None);
    }

    #[test]
    fn test_carrier_status_round_trip() {
        for status in [
            CarrierStatus::None,
            CarrierStatus::Submitted,
            CarrierStatus::Failed,
        ] {
            assert_eq!(CarrierStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_state_consistency_invariant() {
        let mut s = shipment();
        assert!(s.state_consistent());

        s.tracking_number = Some("1Z999".to_string());
        s.carrier_status = CarrierStatus::Submitted;
        assert!(s.state_consistent());

        s.carrier_status = CarrierStatus::Failed;
        assert!(!s.state_consistent());

        s.tracking_number = None;
        assert!(s.state_consistent());
    }

    #[test]
    fn test_awaiting_submission() {
        let mut s = shipment();
        assert!(s.awaiting_submission());

        s.tracking_number = Some("1Z999".to_string());
        assert!(!s.awaiting_submission());

        s.tracking_number = None;
        s.status = ShipmentStatus::LabelReady;
        assert!(!s.awaiting_submission());
    }

    #[test]
    fn test_error_record_from_classified() {
        let classified = crate::error::classify("authentication failed");
        let record = CarrierErrorRecord::from(classified);
        assert_eq!(record.error_category, ErrorCategory::AuthError);
        assert!(!record.can_retry);
        assert_eq!(record.raw_message, "authentication failed");
    }
}
