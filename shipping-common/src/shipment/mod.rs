//! Shipment domain model: the persistent records the submission pipeline
//! reads and the terminal fields it writes.

mod ids;
mod types;

pub use ids::{CarrierServiceId, CustomerId, PackageId, ShipmentId};
pub use types::{
    Address, CarrierErrorRecord, CarrierService, CarrierStatus, Customer, LabelArtifact, Package,
    PackageItem, Shipment, ShipmentStatus,
};
