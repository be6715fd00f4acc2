//! Mock carrier gateway for tests and development.
//!
//! Scriptable: tests choose the outcome of `create_shipment` up front and
//! can inspect call counts and the last canonical request afterwards. An
//! optional artificial delay simulates a slow carrier for timeout tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::request::CanonicalShipmentRequest;
use crate::shipment::LabelArtifact;

use super::error::{CarrierError, CarrierResult};
use super::traits::CarrierGateway;
use super::types::{CarrierCode, CarrierInfo, CarrierResponse, TrackingResponse};

/// Scripted outcome for `create_shipment`.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed with this tracking number and one PDF label
    Succeed { tracking_number: String },
    /// Business rejection with this raw message
    Reject { message: String },
    /// Transport fault
    Fail(CarrierError),
}

/// Mock gateway with scriptable behavior.
pub struct MockGateway {
    info: CarrierInfo,
    outcome: Mutex<MockOutcome>,
    /// Artificial latency before answering, for timeout tests
    delay: Mutex<Option<Duration>>,
    authenticate_calls: AtomicUsize,
    create_calls: AtomicUsize,
    last_request: Mutex<Option<CanonicalShipmentRequest>>,
    fail_authentication: Mutex<bool>,
}

impl MockGateway {
    /// A mock that succeeds with the given tracking number.
    pub fn succeeding(tracking_number: impl Into<String>) -> Self {
        Self::with_outcome(MockOutcome::Succeed {
            tracking_number: tracking_number.into(),
        })
    }

    /// A mock that rejects with the given raw message.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::with_outcome(MockOutcome::Reject {
            message: message.into(),
        })
    }

    /// A mock that fails with the given transport error.
    pub fn failing(error: CarrierError) -> Self {
        Self::with_outcome(MockOutcome::Fail(error))
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            info: CarrierInfo {
                code: CarrierCode::Dhl,
                display_name: "Mock Carrier".to_string(),
                supports_tracking: true,
            },
            outcome: Mutex::new(outcome),
            delay: Mutex::new(None),
            authenticate_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            fail_authentication: Mutex::new(false),
        }
    }

    /// Delay every call by `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Make `authenticate` fail.
    pub fn with_failing_authentication(self) -> Self {
        *self.fail_authentication.lock().unwrap() = true;
        self
    }

    /// Number of `authenticate` calls so far.
    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_shipment` calls so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// The canonical request from the most recent `create_shipment` call.
    pub fn last_request(&self) -> Option<CanonicalShipmentRequest> {
        self.last_request.lock().unwrap().clone()
    }

    async fn apply_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CarrierGateway for MockGateway {
    fn info(&self) -> &CarrierInfo {
        &self.info
    }

    async fn authenticate(&self) -> CarrierResult<()> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        if *self.fail_authentication.lock().unwrap() {
            return Err(CarrierError::Authentication(
                "mock credentials rejected".to_string(),
            ));
        }
        Ok(())
    }

    async fn create_shipment(
        &self,
        request: &CanonicalShipmentRequest,
    ) -> CarrierResult<CarrierResponse> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.apply_delay().await;

        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            MockOutcome::Succeed { tracking_number } => Ok(CarrierResponse::submitted(
                tracking_number,
                vec![LabelArtifact {
                    kind: "label".to_string(),
                    format: "PDF".to_string(),
                    content: "bW9jay1sYWJlbA==".to_string(),
                }],
                None,
            )),
            MockOutcome::Reject { message } => {
                Ok(CarrierResponse::rejected(message, Vec::new(), None))
            }
            MockOutcome::Fail(error) => Err(error),
        }
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse> {
        self.apply_delay().await;
        Ok(TrackingResponse {
            tracking_number: tracking_number.to_string(),
            status: Some("In transit".to_string()),
            estimated_delivery: None,
            events: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::measure::{DimensionUnit, WeightUnit};
    use crate::request::{RequestPackage, ShippingParty};

    fn request() -> CanonicalShipmentRequest {
        let party = ShippingParty {
            name: "Dana".to_string(),
            company: None,
            line1: "12 Elm St".to_string(),
            line2: None,
            city: "Portland".to_string(),
            state: None,
            postal_code: None,
            country_code: "US".to_string(),
            phone: None,
            email: None,
        };
        CanonicalShipmentRequest {
            sender: party.clone(),
            recipient: party,
            packages: vec![RequestPackage {
                weight: dec!(1),
                weight_unit: WeightUnit::Kilogram,
                length: dec!(10),
                width: dec!(10),
                height: dec!(10),
                dimension_unit: DimensionUnit::Centimeter,
            }],
            commodities: Vec::new(),
            declared_value: dec!(10),
            currency: "USD".to_string(),
            service_code: "P".to_string(),
            reference: "ORD-1".to_string(),
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_scripted_success() {
        let gateway = MockGateway::succeeding("TRACK123");
        let response = gateway.create_shipment(&request()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.tracking_number.as_deref(), Some("TRACK123"));
        assert_eq!(gateway.create_calls(), 1);
        assert!(gateway.last_request().is_some());
    }

    #[tokio::test]
    async fn test_scripted_rejection() {
        let gateway = MockGateway::rejecting("address invalid");
        let response = gateway.create_shipment(&request()).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error_message.as_deref(), Some("address invalid"));
    }

    #[tokio::test]
    async fn test_scripted_fault() {
        let gateway = MockGateway::failing(CarrierError::Timeout("elapsed".to_string()));
        let err = gateway.create_shipment(&request()).await.unwrap_err();
        assert!(matches!(err, CarrierError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_failing_authentication() {
        let gateway = MockGateway::succeeding("T").with_failing_authentication();
        assert!(gateway.authenticate().await.is_err());
        assert_eq!(gateway.authenticate_calls(), 1);
    }
}
