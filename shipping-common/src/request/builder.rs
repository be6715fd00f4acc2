//! Canonical request construction.
//!
//! `build_request` is the only way a [`CanonicalShipmentRequest`] comes into
//! existence: it resolves the sender from warehouse data, filters the
//! recipient through the address rules, flattens package items into
//! commodities, and pushes every measurement through the numeric normalizer.
//! Failures here are local validation problems, never offered to a carrier.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::address::{accepts_field, AddressField};
use crate::error::{ErrorCategory, ErrorClassification};
use crate::measure::{normalize, normalized_from_f64, DimensionUnit, WeightUnit};
use crate::shipment::{Address, Package, Shipment};

use super::types::{CanonicalShipmentRequest, Commodity, RequestPackage, ShippingParty};

/// Local validation failures raised while building a canonical request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Recipient address is missing required field: {0}")]
    MissingRecipientField(&'static str),

    #[error("Shipment has no packages")]
    NoPackages,

    #[error("Package {0} has no items")]
    EmptyPackage(usize),

    #[error("Declared value must be positive, got {0}")]
    NonPositiveDeclaredValue(Decimal),
}

impl ErrorClassification for ValidationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::SystemError
    }
}

/// Everything `build_request` needs, gathered by the orchestrator's single
/// eager read plus configuration.
#[derive(Debug, Clone)]
pub struct BuildInputs<'a> {
    pub shipment: &'a Shipment,
    pub packages: &'a [Package],
    /// The customer's chosen delivery address
    pub recipient: &'a Address,
    /// Warehouse origin address
    pub sender: &'a Address,
    /// Carrier API service identifier from the resolver
    pub service_code: &'a str,
    pub ship_date: NaiveDate,
    /// Fractional digits for normalized measurements
    pub precision: u32,
}

/// Build the canonical request. Pure: no side effects, no network access.
pub fn build_request(inputs: BuildInputs<'_>) -> Result<CanonicalShipmentRequest, ValidationError> {
    let recipient = validated_party(inputs.recipient)?;
    let sender = party_from_address(inputs.sender);

    if inputs.packages.is_empty() {
        return Err(ValidationError::NoPackages);
    }

    let mut packages = Vec::with_capacity(inputs.packages.len());
    let mut commodities = Vec::new();
    let mut declared_value = Decimal::ZERO;

    for (index, package) in inputs.packages.iter().enumerate() {
        if package.items.is_empty() {
            return Err(ValidationError::EmptyPackage(index));
        }

        packages.push(RequestPackage {
            weight: normalized_from_f64(package.weight_kg, inputs.precision),
            weight_unit: WeightUnit::Kilogram,
            length: normalized_from_f64(package.length_cm, inputs.precision),
            width: normalized_from_f64(package.width_cm, inputs.precision),
            height: normalized_from_f64(package.height_cm, inputs.precision),
            dimension_unit: DimensionUnit::Centimeter,
        });

        for item in &package.items {
            let unit_value = normalize(item.unit_value, inputs.precision);
            declared_value += unit_value * Decimal::from(item.quantity);

            commodities.push(Commodity {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_value,
                unit_weight: normalized_from_f64(item.weight_kg, inputs.precision),
                weight_unit: WeightUnit::Kilogram,
                origin_country: item.origin_country.to_ascii_uppercase(),
                tariff_code: item.hs_code.clone(),
            });
        }
    }

    if declared_value <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveDeclaredValue(declared_value));
    }

    Ok(CanonicalShipmentRequest {
        sender,
        recipient,
        packages,
        commodities,
        declared_value: normalize(declared_value, inputs.precision),
        currency: inputs.shipment.currency.clone(),
        service_code: inputs.service_code.to_string(),
        reference: inputs.shipment.reference.clone(),
        ship_date: inputs.ship_date,
    })
}

/// Validate the recipient and apply the per-country field rules.
fn validated_party(address: &Address) -> Result<ShippingParty, ValidationError> {
    if address.name.trim().is_empty() {
        return Err(ValidationError::MissingRecipientField("name"));
    }
    if address.line1.trim().is_empty() {
        return Err(ValidationError::MissingRecipientField("line1"));
    }
    if address.city.trim().is_empty() {
        return Err(ValidationError::MissingRecipientField("city"));
    }
    if address.country_code.trim().is_empty() {
        return Err(ValidationError::MissingRecipientField("country_code"));
    }

    Ok(party_from_address(address))
}

/// Map a stored address onto a request party, dropping fields the
/// destination country's carriers refuse.
fn party_from_address(address: &Address) -> ShippingParty {
    let country = address.country_code.trim().to_ascii_uppercase();

    let state = address
        .state
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .filter(|_| accepts_field(&country, AddressField::State))
        .cloned();

    let postal_code = address
        .postal_code
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .filter(|_| accepts_field(&country, AddressField::PostalCode))
        .cloned();

    ShippingParty {
        name: address.name.clone(),
        company: address.company.clone(),
        line1: address.line1.clone(),
        line2: address.line2.clone(),
        city: address.city.clone(),
        state,
        postal_code,
        country_code: country,
        phone: address.phone.clone(),
        email: address.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::shipment::{
        CarrierStatus, CustomerId, PackageId, PackageItem, ShipmentId, ShipmentStatus,
    };

    fn shipment() -> Shipment {
        Shipment {
            id: ShipmentId::generate(),
            customer_id: CustomerId::generate(),
            reference: "ORD-2042".to_string(),
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

    fn package(shipment_id: ShipmentId) -> Package {
        Package {
            id: PackageId::generate(),
            shipment_id,
            weight_kg: 2.0,
            length_cm: 30.0,
            width_cm: 20.0,
            height_cm: 10.0,
            items: vec![PackageItem {
                description: "Wool sweater".to_string(),
                quantity: 2,
                weight_kg: 0.9,
                unit_value: dec!(39.95),
                origin_country: "pt".to_string(),
                hs_code: Some("6110.11".to_string()),
            }],
        }
    }

    fn us_address() -> Address {
        Address {
            name: "Dana Smith".to_string(),
            company: None,
            line1: "12 Elm St".to_string(),
            line2: None,
            city: "Portland".to_string(),
            state: Some("OR".to_string()),
            postal_code: Some("97201".to_string()),
            country_code: "US".to_string(),
            phone: Some("+1 555 0100".to_string()),
            email: Some("dana@example.com".to_string()),
        }
    }

    fn warehouse() -> Address {
        Address {
            name: "Fulfilment".to_string(),
            company: Some("Acme Outfitters".to_string()),
            line1: "1 Depot Way".to_string(),
            line2: None,
            city: "Reno".to_string(),
            state: Some("NV".to_string()),
            postal_code: Some("89501".to_string()),
            country_code: "US".to_string(),
            phone: Some("+1 555 0911".to_string()),
            email: None,
        }
    }

    fn inputs<'a>(
        shipment: &'a Shipment,
        packages: &'a [Package],
        recipient: &'a Address,
        sender: &'a Address,
    ) -> BuildInputs<'a> {
        BuildInputs {
            shipment,
            packages,
            recipient,
            sender,
            service_code: "EXPRESS",
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            precision: 3,
        }
    }

    #[test]
    fn test_build_happy_path() {
        let shipment = shipment();
        let packages = vec![package(shipment.id)];
        let recipient = us_address();
        let sender = warehouse();

        let request = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap();

        assert_eq!(request.packages.len(), 1);
        assert_eq!(request.commodities.len(), 1);
        assert_eq!(request.packages[0].weight, dec!(2));
        assert_eq!(request.declared_value, dec!(79.90));
        assert_eq!(request.commodities[0].origin_country, "PT");
        assert_eq!(request.service_code, "EXPRESS");
        assert_eq!(request.reference, "ORD-2042");
        assert!(!request.is_international());
    }

    #[test]
    fn test_measurements_are_exact_decimals() {
        let shipment = shipment();
        let mut pkg = package(shipment.id);
        pkg.weight_kg = 4.409; // not binary-representable
        let packages = vec![pkg];
        let recipient = us_address();
        let sender = warehouse();

        let request = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap();
        assert_eq!(request.packages[0].weight.to_string(), "4.409");
    }

    #[test]
    fn test_state_omitted_for_rejecting_country() {
        let shipment = shipment();
        let packages = vec![package(shipment.id)];
        let mut recipient = us_address();
        recipient.country_code = "GB".to_string();
        recipient.state = Some("Greater London".to_string());
        recipient.postal_code = Some("SW1A 1AA".to_string());
        let sender = warehouse();

        let request = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap();
        assert_eq!(request.recipient.state, None);
        assert_eq!(request.recipient.postal_code.as_deref(), Some("SW1A 1AA"));
        assert!(request.is_international());
    }

    #[test]
    fn test_missing_recipient_city_rejected() {
        let shipment = shipment();
        let packages = vec![package(shipment.id)];
        let mut recipient = us_address();
        recipient.city = "  ".to_string();
        let sender = warehouse();

        let err = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap_err();
        assert_eq!(err, ValidationError::MissingRecipientField("city"));
        assert_eq!(err.category(), ErrorCategory::SystemError);
    }

    #[test]
    fn test_no_packages_rejected() {
        let shipment = shipment();
        let recipient = us_address();
        let sender = warehouse();

        let err = build_request(inputs(&shipment, &[], &recipient, &sender)).unwrap_err();
        assert_eq!(err, ValidationError::NoPackages);
    }

    #[test]
    fn test_zero_declared_value_rejected() {
        let shipment = shipment();
        let mut pkg = package(shipment.id);
        pkg.items[0].unit_value = Decimal::ZERO;
        let packages = vec![pkg];
        let recipient = us_address();
        let sender = warehouse();

        let err = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveDeclaredValue(_)));
    }

    #[test]
    fn test_commodity_order_follows_package_order() {
        let shipment = shipment();
        let mut first = package(shipment.id);
        first.items[0].description = "first".to_string();
        let mut second = package(shipment.id);
        second.items[0].description = "second".to_string();
        let packages = vec![first, second];
        let recipient = us_address();
        let sender = warehouse();

        let request = build_request(inputs(&shipment, &packages, &recipient, &sender)).unwrap();
        let descriptions: Vec<_> = request
            .commodities
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }
}
