//! FedEx gateway (Ship API).
//!
//! OAuth2 client-credentials authentication with a cached bearer token;
//! shipment creation posts to `/ship/v1/shipments`.

mod gateway;
mod types;

pub use gateway::FedexGateway;
