//! Wire types for the UPS Shipping API.
//!
//! UPS uses PascalCase member names and string-typed numerics throughout.

use serde::{Deserialize, Serialize};

use crate::request::{CanonicalShipmentRequest, ShippingParty};

#[derive(Debug, Deserialize)]
pub struct UpsTokenResponse {
    pub access_token: String,
    /// Issued as a string, e.g. `"14399"`
    pub expires_in: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipRequest {
    pub shipment_request: UpsShipmentRequestBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentRequestBody {
    pub shipment: UpsShipment,
    pub label_specification: UpsLabelSpecification,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipment {
    pub description: String,
    pub shipper: UpsShipper,
    pub ship_to: UpsParty,
    pub ship_from: UpsParty,
    pub payment_information: UpsPaymentInformation,
    pub service: UpsCode,
    pub package: Vec<UpsPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_line_total: Option<UpsMoney>,
    pub reference_number: UpsReferenceNumber,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipper {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper_number: Option<String>,
    pub address: UpsAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsParty {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attention_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<UpsPhone>,
    pub address: UpsAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPhone {
    pub number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsAddress {
    pub address_line: Vec<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPaymentInformation {
    pub shipment_charge: UpsShipmentCharge,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentCharge {
    /// "01" = transportation, billed to shipper
    #[serde(rename = "Type")]
    pub charge_type: String,
    pub bill_shipper: UpsBillShipper,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsBillShipper {
    pub account_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsCode {
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsMoney {
    pub currency_code: String,
    pub monetary_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsReferenceNumber {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackage {
    pub packaging: UpsCode,
    pub dimensions: UpsDimensions,
    pub package_weight: UpsPackageWeight,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsDimensions {
    pub unit_of_measurement: UpsCode,
    pub length: String,
    pub width: String,
    pub height: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackageWeight {
    pub unit_of_measurement: UpsCode,
    pub weight: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsLabelSpecification {
    pub label_image_format: UpsCode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipResponse {
    pub shipment_response: UpsShipmentResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentResponseBody {
    pub shipment_results: UpsShipmentResults,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentResults {
    pub shipment_identification_number: String,
    #[serde(default)]
    pub package_results: Vec<UpsPackageResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackageResults {
    #[serde(default)]
    pub shipping_label: Option<UpsShippingLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShippingLabel {
    #[serde(default)]
    pub image_format: Option<UpsResponseCode>,
    pub graphic_image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsResponseCode {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsErrorEnvelope {
    pub response: UpsErrorResponse,
}

#[derive(Debug, Deserialize)]
pub struct UpsErrorResponse {
    #[serde(default)]
    pub errors: Vec<UpsError>,
}

#[derive(Debug, Deserialize)]
pub struct UpsError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsTrackResponse {
    pub track_response: UpsTrackResponseBody,
}

#[derive(Debug, Deserialize)]
pub struct UpsTrackResponseBody {
    #[serde(default)]
    pub shipment: Vec<UpsTrackShipment>,
}

#[derive(Debug, Deserialize)]
pub struct UpsTrackShipment {
    #[serde(default)]
    pub package: Vec<UpsTrackPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsTrackPackage {
    pub tracking_number: String,
    #[serde(default)]
    pub activity: Vec<UpsTrackActivity>,
}

#[derive(Debug, Deserialize)]
pub struct UpsTrackActivity {
    #[serde(default)]
    pub status: Option<UpsTrackStatus>,
    #[serde(default)]
    pub location: Option<UpsTrackLocation>,
}

#[derive(Debug, Deserialize)]
pub struct UpsTrackStatus {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsTrackLocation {
    #[serde(default)]
    pub address: Option<UpsTrackAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsTrackAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl UpsParty {
    pub fn from_party(party: &ShippingParty) -> Self {
        let mut address_line = vec![party.line1.clone()];
        if let Some(line2) = &party.line2 {
            address_line.push(line2.clone());
        }

        Self {
            name: party
                .company
                .clone()
                .unwrap_or_else(|| party.name.clone()),
            attention_name: Some(party.name.clone()),
            phone: party.phone.clone().map(|number| UpsPhone { number }),
            address: UpsAddress {
                address_line,
                city: party.city.clone(),
                state_province_code: party.state.clone(),
                postal_code: party.postal_code.clone(),
                country_code: party.country_code.clone(),
            },
        }
    }
}

impl UpsShipRequest {
    /// Map a canonical request onto the Shipping API payload.
    ///
    /// UPS bills everything to the shipper account, so `account` is
    /// required at the gateway layer before this conversion runs.
    pub fn from_canonical(request: &CanonicalShipmentRequest, account: &str) -> Self {
        let sender = &request.sender;

        let packages = request
            .packages
            .iter()
            .map(|p| UpsPackage {
                packaging: UpsCode {
                    // "02" = customer-supplied package
                    code: "02".to_string(),
                },
                dimensions: UpsDimensions {
                    unit_of_measurement: UpsCode {
                        code: p.dimension_unit.code().to_string(),
                    },
                    length: p.length.to_string(),
                    width: p.width.to_string(),
                    height: p.height.to_string(),
                },
                package_weight: UpsPackageWeight {
                    unit_of_measurement: UpsCode {
                        code: match p.weight_unit.code() {
                            "KG" => "KGS".to_string(),
                            _ => "LBS".to_string(),
                        },
                    },
                    weight: p.weight.to_string(),
                },
            })
            .collect();

        let description = request
            .commodities
            .first()
            .map(|c| c.description.clone())
            .unwrap_or_else(|| "Merchandise".to_string());

        Self {
            shipment_request: UpsShipmentRequestBody {
                shipment: UpsShipment {
                    description,
                    shipper: UpsShipper {
                        name: sender
                            .company
                            .clone()
                            .unwrap_or_else(|| sender.name.clone()),
                        shipper_number: Some(account.to_string()),
                        address: UpsAddress {
                            address_line: vec![sender.line1.clone()],
                            city: sender.city.clone(),
                            state_province_code: sender.state.clone(),
                            postal_code: sender.postal_code.clone(),
                            country_code: sender.country_code.clone(),
                        },
                    },
                    ship_to: UpsParty::from_party(&request.recipient),
                    ship_from: UpsParty::from_party(sender),
                    payment_information: UpsPaymentInformation {
                        shipment_charge: UpsShipmentCharge {
                            charge_type: "01".to_string(),
                            bill_shipper: UpsBillShipper {
                                account_number: account.to_string(),
                            },
                        },
                    },
                    service: UpsCode {
                        code: request.service_code.clone(),
                    },
                    package: packages,
                    invoice_line_total: request.is_international().then(|| UpsMoney {
                        currency_code: request.currency.clone(),
                        monetary_value: request.declared_value.to_string(),
                    }),
                    reference_number: UpsReferenceNumber {
                        value: request.reference.clone(),
                    },
                },
                label_specification: UpsLabelSpecification {
                    label_image_format: UpsCode {
                        code: "GIF".to_string(),
                    },
                },
            },
        }
    }
}
