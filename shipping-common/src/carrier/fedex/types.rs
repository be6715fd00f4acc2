//! Wire types for the FedEx Ship API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::request::{CanonicalShipmentRequest, ShippingParty};

#[derive(Debug, Deserialize)]
pub struct FedexTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipmentRequest {
    pub requested_shipment: FedexRequestedShipment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<FedexAccountNumber>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexAccountNumber {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRequestedShipment {
    pub ship_datestamp: String,
    pub service_type: String,
    pub packaging_type: String,
    pub pickup_type: String,
    pub shipper: FedexParty,
    pub recipients: Vec<FedexParty>,
    pub shipping_charges_payment: FedexPayment,
    pub label_specification: FedexLabelSpecification,
    pub requested_package_line_items: Vec<FedexPackageLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_clearance_detail: Option<FedexCustomsClearance>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexParty {
    pub contact: FedexContact,
    pub address: FedexAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexContact {
    pub person_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexAddress {
    pub street_lines: Vec<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPayment {
    pub payment_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexLabelSpecification {
    pub image_type: String,
    pub label_stock_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPackageLineItem {
    pub weight: FedexWeight,
    pub dimensions: FedexDimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_references: Option<Vec<FedexCustomerReference>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexWeight {
    pub units: String,
    pub value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub units: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCustomerReference {
    pub customer_reference_type: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCustomsClearance {
    pub duties_payment: FedexPayment,
    pub total_customs_value: FedexMoney,
    pub commodities: Vec<FedexCommodity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexMoney {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCommodity {
    pub description: String,
    pub quantity: u32,
    pub quantity_units: String,
    pub unit_price: FedexMoney,
    pub customs_value: FedexMoney,
    pub weight: FedexWeight,
    pub country_of_manufacture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonized_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipmentResponse {
    pub output: FedexShipmentOutput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipmentOutput {
    #[serde(default)]
    pub transaction_shipments: Vec<FedexTransactionShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTransactionShipment {
    pub master_tracking_number: String,
    #[serde(default)]
    pub piece_responses: Vec<FedexPieceResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPieceResponse {
    #[serde(default)]
    pub package_documents: Vec<FedexPackageDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPackageDocument {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub encoded_label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexErrorResponse {
    #[serde(default)]
    pub errors: Vec<FedexError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingRequest {
    pub include_detailed_scans: bool,
    pub tracking_info: Vec<FedexTrackingInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingInfo {
    pub tracking_number_info: FedexTrackingNumberInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingNumberInfo {
    pub tracking_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingResponse {
    pub output: FedexTrackingOutput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingOutput {
    #[serde(default)]
    pub complete_track_results: Vec<FedexCompleteTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCompleteTrackResult {
    pub tracking_number: String,
    #[serde(default)]
    pub track_results: Vec<FedexTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackResult {
    #[serde(default)]
    pub latest_status_detail: Option<FedexStatusDetail>,
    #[serde(default)]
    pub scan_events: Vec<FedexScanEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexStatusDetail {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexScanEvent {
    #[serde(default)]
    pub event_description: Option<String>,
    #[serde(default)]
    pub scan_location: Option<FedexScanLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexScanLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl FedexParty {
    pub fn from_party(party: &ShippingParty) -> Self {
        let mut street_lines = vec![party.line1.clone()];
        if let Some(line2) = &party.line2 {
            street_lines.push(line2.clone());
        }

        Self {
            contact: FedexContact {
                person_name: party.name.clone(),
                company_name: party.company.clone(),
                phone_number: party.phone.clone(),
                email_address: party.email.clone(),
            },
            address: FedexAddress {
                street_lines,
                city: party.city.clone(),
                state_or_province_code: party.state.clone(),
                postal_code: party.postal_code.clone(),
                country_code: party.country_code.clone(),
            },
        }
    }
}

impl FedexShipmentRequest {
    /// Map a canonical request onto the Ship API payload.
    pub fn from_canonical(request: &CanonicalShipmentRequest, account: Option<&str>) -> Self {
        let packages = request
            .packages
            .iter()
            .map(|p| FedexPackageLineItem {
                weight: FedexWeight {
                    units: p.weight_unit.code().to_string(),
                    value: p.weight,
                },
                dimensions: FedexDimensions {
                    length: p.length,
                    width: p.width,
                    height: p.height,
                    units: p.dimension_unit.code().to_string(),
                },
                customer_references: Some(vec![FedexCustomerReference {
                    customer_reference_type: "CUSTOMER_REFERENCE".to_string(),
                    value: request.reference.clone(),
                }]),
            })
            .collect();

        let customs_clearance_detail = request.is_international().then(|| FedexCustomsClearance {
            duties_payment: FedexPayment {
                payment_type: "SENDER".to_string(),
            },
            total_customs_value: FedexMoney {
                amount: request.declared_value,
                currency: request.currency.clone(),
            },
            commodities: request
                .commodities
                .iter()
                .map(|c| FedexCommodity {
                    description: c.description.clone(),
                    quantity: c.quantity,
                    quantity_units: "PCS".to_string(),
                    unit_price: FedexMoney {
                        amount: c.unit_value,
                        currency: request.currency.clone(),
                    },
                    customs_value: FedexMoney {
                        amount: c.unit_value * Decimal::from(c.quantity),
                        currency: request.currency.clone(),
                    },
                    weight: FedexWeight {
                        units: c.weight_unit.code().to_string(),
                        value: c.unit_weight,
                    },
                    country_of_manufacture: c.origin_country.clone(),
                    harmonized_code: c.tariff_code.clone(),
                })
                .collect(),
        });

        Self {
            requested_shipment: FedexRequestedShipment {
                ship_datestamp: request.ship_date.format("%Y-%m-%d").to_string(),
                service_type: request.service_code.clone(),
                packaging_type: "YOUR_PACKAGING".to_string(),
                pickup_type: "USE_SCHEDULED_PICKUP".to_string(),
                shipper: FedexParty::from_party(&request.sender),
                recipients: vec![FedexParty::from_party(&request.recipient)],
                shipping_charges_payment: FedexPayment {
                    payment_type: "SENDER".to_string(),
                },
                label_specification: FedexLabelSpecification {
                    image_type: "PDF".to_string(),
                    label_stock_type: "PAPER_4X6".to_string(),
                },
                requested_package_line_items: packages,
                customs_clearance_detail,
            },
            account_number: account.map(|value| FedexAccountNumber {
                value: value.to_string(),
            }),
        }
    }
}
