//! DHL Express gateway (MyDHL API).
//!
//! JSON over HTTPS with Basic authentication. Shipment creation posts to
//! `/shipments`; customs-declarable content carries an export declaration
//! built from the canonical commodities.

mod gateway;
mod types;

pub use gateway::DhlGateway;
