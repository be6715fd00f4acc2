//! The carrier gateway capability set.

use async_trait::async_trait;

use crate::request::CanonicalShipmentRequest;

use super::error::CarrierResult;
use super::types::{CarrierInfo, CarrierResponse, TrackingResponse};

/// One external shipping carrier, behind its own wire protocol.
///
/// Implementations own everything carrier-specific: endpoints, HTTP verbs,
/// payload shapes, authentication. They must not mutate shared state from
/// `create_shipment`; a failed call leaves the gateway exactly as it was.
///
/// # Example
///
/// ```ignore
/// async fn submit<G: CarrierGateway + ?Sized>(gateway: &G, request: &CanonicalShipmentRequest) {
///     gateway.authenticate().await?;
///     match gateway.create_shipment(request).await {
///         Ok(response) if response.success => println!("{:?}", response.tracking_number),
///         Ok(response) => println!("rejected: {:?}", response.error_message),
///         Err(fault) => println!("transport fault: {fault}"),
///     }
/// }
/// ```
#[async_trait]
pub trait CarrierGateway: Send + Sync {
    /// Static information about this gateway.
    fn info(&self) -> &CarrierInfo;

    /// Verify credentials against the carrier.
    ///
    /// # Errors
    ///
    /// `CarrierError::Authentication` when the carrier rejects the
    /// credentials; other transport variants when it cannot be reached.
    async fn authenticate(&self) -> CarrierResult<()>;

    /// Create a shipment and return the normalized outcome.
    ///
    /// Business rejections return `Ok` with `success = false`; only
    /// transport faults return `Err`. Implementations must be safe to call
    /// once per submission attempt with no partial side effects on failure.
    async fn create_shipment(
        &self,
        request: &CanonicalShipmentRequest,
    ) -> CarrierResult<CarrierResponse>;

    /// Look up tracking state for an existing shipment.
    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_send_sync<T: Send + Sync>() {}

    fn _check_trait_bounds() {
        _assert_send_sync::<Box<dyn CarrierGateway>>();
    }
}
