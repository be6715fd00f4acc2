//! MyUS gateway (parcel-forwarding API).
//!
//! Simple JSON API authenticated with an `X-Api-Key` header; shipments are
//! created under `/v1/shipments`.

mod gateway;
mod types;

pub use gateway::MyusGateway;
