//! Carrier gateway abstraction and concrete carrier variants.
//!
//! Each external carrier is wrapped in one gateway implementing
//! [`CarrierGateway`]: authenticate, create a shipment, track. Wire formats,
//! HTTP verbs, and authentication schemes are fully encapsulated per variant;
//! callers only ever see [`CanonicalShipmentRequest`](crate::request) in and
//! [`CarrierResponse`](types::CarrierResponse) out.
//!
//! Business rejections (the carrier understood us and said no) come back as
//! `success = false` responses. Transport faults (we never got a usable
//! answer) are [`CarrierError`](error::CarrierError)s. The submission
//! orchestrator treats the two very differently, so gateways must never
//! blur them.

pub mod config;
pub mod dhl;
pub mod error;
pub mod fedex;
pub mod http;
pub mod mock;
pub mod myus;
mod oauth;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod ups;

pub use config::{AuthConfig, CarrierConfig, CarriersConfig, RestConfig};
pub use error::{CarrierError, CarrierResult};
pub use resolver::{
    resolve_carrier, CarrierGatewayFactory, GatewayFactory, ResolvedCarrier, ResolverError,
};
pub use traits::CarrierGateway;
pub use types::{
    CarrierApiError, CarrierCode, CarrierInfo, CarrierResponse, TrackingEvent, TrackingResponse,
};
