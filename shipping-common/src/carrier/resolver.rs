//! Carrier resolution and gateway construction.
//!
//! Resolution precedence is fixed and deterministic: a structured
//! carrier-service record always wins over the legacy numeric
//! shipping-option identifier. Replaying resolution against the same
//! shipment state yields the same (carrier, service) pair every time.

use thiserror::Error;

use crate::error::{ErrorCategory, ErrorClassification};
use crate::shipment::{CarrierService, Shipment};

use super::config::CarriersConfig;
use super::dhl::DhlGateway;
use super::error::CarrierResult;
use super::fedex::FedexGateway;
use super::myus::MyusGateway;
use super::traits::CarrierGateway;
use super::types::CarrierCode;
use super::ups::UpsGateway;

/// Legacy numeric shipping options still present on older shipments.
/// Append-only: option ids are stored in historical records.
const LEGACY_OPTIONS: &[(i32, CarrierCode, &str)] = &[
    (1, CarrierCode::Ups, "03"),                // UPS Ground
    (2, CarrierCode::Ups, "02"),                // UPS 2nd Day Air
    (3, CarrierCode::Ups, "07"),                // UPS Worldwide Express
    (4, CarrierCode::Fedex, "FEDEX_GROUND"),
    (5, CarrierCode::Fedex, "PRIORITY_OVERNIGHT"),
    (6, CarrierCode::Fedex, "INTERNATIONAL_PRIORITY"),
    (7, CarrierCode::Dhl, "N"),                 // DHL Domestic Express
    (8, CarrierCode::Dhl, "P"),                 // DHL Express Worldwide
    (9, CarrierCode::Myus, "standard"),
    (10, CarrierCode::Myus, "express"),
];

/// Configuration-level failures while resolving a shipment to a carrier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolverError {
    #[error("Shipment references carrier service {0} but the record was not loaded")]
    ServiceRecordMissing(String),

    #[error("Carrier service record names unknown carrier code: {0}")]
    UnknownCarrierCode(String),

    #[error("Unknown legacy shipping option id: {0}")]
    UnknownLegacyOption(i32),

    #[error("Shipment has neither a carrier service nor a legacy shipping option")]
    NoSelection,

    #[error("Carrier {0} is disabled in configuration")]
    CarrierDisabled(CarrierCode),
}

impl ErrorClassification for ResolverError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::SystemError
    }
}

/// Outcome of resolution: which gateway to build and which carrier API
/// service identifier to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCarrier {
    pub code: CarrierCode,
    pub service_code: String,
}

/// Resolve the carrier and service for a shipment.
///
/// `carrier_service` is the eagerly loaded record for
/// `shipment.carrier_service_id`, when one is referenced.
pub fn resolve_carrier(
    shipment: &Shipment,
    carrier_service: Option<&CarrierService>,
) -> Result<ResolvedCarrier, ResolverError> {
    if let Some(service_id) = shipment.carrier_service_id {
        let service = carrier_service
            .filter(|s| s.id == service_id)
            .ok_or_else(|| ResolverError::ServiceRecordMissing(service_id.to_string()))?;

        let code = CarrierCode::parse(&service.carrier_code)
            .ok_or_else(|| ResolverError::UnknownCarrierCode(service.carrier_code.clone()))?;

        return Ok(ResolvedCarrier {
            code,
            service_code: service.api_service_code.clone(),
        });
    }

    if let Some(option_id) = shipment.legacy_shipping_option {
        let (_, code, service_code) = LEGACY_OPTIONS
            .iter()
            .find(|(id, _, _)| *id == option_id)
            .ok_or(ResolverError::UnknownLegacyOption(option_id))?;

        return Ok(ResolvedCarrier {
            code: *code,
            service_code: (*service_code).to_string(),
        });
    }

    Err(ResolverError::NoSelection)
}

/// Builds gateways from carrier codes. A trait so tests can substitute
/// scripted gateways for the real HTTP-backed ones.
pub trait GatewayFactory: Send + Sync {
    /// Build a gateway for the given carrier.
    ///
    /// # Errors
    ///
    /// `CarrierError::Configuration` when the carrier is disabled or its
    /// credentials are missing from the environment.
    fn create(&self, code: CarrierCode) -> CarrierResult<Box<dyn CarrierGateway>>;
}

/// The production factory: one HTTP gateway per carrier, configured from
/// [`CarriersConfig`].
#[derive(Debug, Clone)]
pub struct CarrierGatewayFactory {
    config: CarriersConfig,
}

impl CarrierGatewayFactory {
    pub fn new(config: CarriersConfig) -> Self {
        Self { config }
    }
}

impl GatewayFactory for CarrierGatewayFactory {
    fn create(&self, code: CarrierCode) -> CarrierResult<Box<dyn CarrierGateway>> {
        let carrier_config = match code {
            CarrierCode::Dhl => &self.config.dhl,
            CarrierCode::Fedex => &self.config.fedex,
            CarrierCode::Ups => &self.config.ups,
            CarrierCode::Myus => &self.config.myus,
        };

        if !carrier_config.enabled {
            return Err(super::error::CarrierError::Configuration(format!(
                "carrier {code} is disabled"
            )));
        }

        match code {
            CarrierCode::Dhl => Ok(Box::new(DhlGateway::new(carrier_config.clone())?)),
            CarrierCode::Fedex => Ok(Box::new(FedexGateway::new(carrier_config.clone())?)),
            CarrierCode::Ups => Ok(Box::new(UpsGateway::new(carrier_config.clone())?)),
            CarrierCode::Myus => Ok(Box::new(MyusGateway::new(carrier_config.clone())?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::shipment::{CarrierServiceId, CarrierStatus, CustomerId, ShipmentId, ShipmentStatus};

    fn shipment() -> Shipment {
        Shipment {
            id: ShipmentId::generate(),
            customer_id: CustomerId::generate(),
            reference: "ORD-7".to_string(),
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

    fn service(id: CarrierServiceId, carrier_code: &str) -> CarrierService {
        CarrierService {
            id,
            carrier_code: carrier_code.to_string(),
            service_code: "express".to_string(),
            api_service_code: "P".to_string(),
            display_name: "Express Worldwide".to_string(),
        }
    }

    #[test]
    fn test_structured_service_wins_over_legacy_option() {
        let service_id = CarrierServiceId::generate();
        let mut s = shipment();
        s.carrier_service_id = Some(service_id);
        s.legacy_shipping_option = Some(4); // would resolve to FedEx
        let record = service(service_id, "dhl");

        // Deterministic across repeated invocations.
        for _ in 0..3 {
            let resolved = resolve_carrier(&s, Some(&record)).unwrap();
            assert_eq!(resolved.code, CarrierCode::Dhl);
            assert_eq!(resolved.service_code, "P");
        }
    }

    #[test]
    fn test_legacy_option_fallback() {
        let mut s = shipment();
        s.legacy_shipping_option = Some(4);

        let resolved = resolve_carrier(&s, None).unwrap();
        assert_eq!(resolved.code, CarrierCode::Fedex);
        assert_eq!(resolved.service_code, "FEDEX_GROUND");
    }

    #[test]
    fn test_unknown_legacy_option() {
        let mut s = shipment();
        s.legacy_shipping_option = Some(999);

        assert_eq!(
            resolve_carrier(&s, None),
            Err(ResolverError::UnknownLegacyOption(999))
        );
    }

    #[test]
    fn test_no_selection() {
        assert_eq!(resolve_carrier(&shipment(), None), Err(ResolverError::NoSelection));
    }

    #[test]
    fn test_unknown_carrier_code_in_service_record() {
        let service_id = CarrierServiceId::generate();
        let mut s = shipment();
        s.carrier_service_id = Some(service_id);
        let record = service(service_id, "pigeon-post");

        assert_eq!(
            resolve_carrier(&s, Some(&record)),
            Err(ResolverError::UnknownCarrierCode("pigeon-post".to_string()))
        );
    }

    #[test]
    fn test_service_record_must_match_reference() {
        let mut s = shipment();
        s.carrier_service_id = Some(CarrierServiceId::generate());
        // Loaded record has a different id.
        let record = service(CarrierServiceId::generate(), "dhl");

        assert!(matches!(
            resolve_carrier(&s, Some(&record)),
            Err(ResolverError::ServiceRecordMissing(_))
        ));
    }

    #[test]
    fn test_resolver_error_is_system_error() {
        assert_eq!(
            ResolverError::NoSelection.category(),
            ErrorCategory::SystemError
        );
        assert!(ResolverError::NoSelection.can_retry());
    }

    #[test]
    fn test_legacy_table_covers_all_carriers() {
        let mut codes: Vec<CarrierCode> = LEGACY_OPTIONS.iter().map(|(_, c, _)| *c).collect();
        codes.dedup();
        assert!(codes.contains(&CarrierCode::Dhl));
        assert!(codes.contains(&CarrierCode::Fedex));
        assert!(codes.contains(&CarrierCode::Ups));
        assert!(codes.contains(&CarrierCode::Myus));
    }

    #[test]
    fn test_factory_rejects_disabled_carrier() {
        let mut config = CarriersConfig::default();
        config.ups.enabled = false;
        let factory = CarrierGatewayFactory::new(config);

        let err = match factory.create(CarrierCode::Ups) {
            Ok(_) => panic!("called `Result::unwrap_err()` on an `Ok` value"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("disabled"));
    }
}
