//! Carrier-agnostic shipment requests.
//!
//! The [`CanonicalShipmentRequest`] is the single intermediate representation
//! every gateway consumes; it is built fresh per submission attempt and never
//! persisted. Building is pure: no I/O, no clock reads, no carrier knowledge.

mod builder;
mod types;

pub use builder::{build_request, BuildInputs, ValidationError};
pub use types::{CanonicalShipmentRequest, Commodity, RequestPackage, ShippingParty};
