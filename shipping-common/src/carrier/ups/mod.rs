//! UPS gateway (Shipping API).
//!
//! OAuth2 client-credentials authentication (Basic-authenticated token
//! endpoint) with a cached bearer token; shipment creation posts to
//! `/api/shipments/v1/ship`.

mod gateway;
mod types;

pub use gateway::UpsGateway;
