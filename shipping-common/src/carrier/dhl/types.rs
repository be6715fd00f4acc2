//! Wire types for the MyDHL API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::request::{CanonicalShipmentRequest, ShippingParty};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlShipmentRequest {
    pub planned_shipping_date_and_time: String,
    pub pickup: DhlPickup,
    pub product_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<DhlAccount>,
    pub customer_details: DhlCustomerDetails,
    pub content: DhlContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlPickup {
    pub is_requested: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlAccount {
    pub type_code: String,
    pub number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlCustomerDetails {
    pub shipper_details: DhlParty,
    pub receiver_details: DhlParty,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlParty {
    pub postal_address: DhlPostalAddress,
    pub contact_information: DhlContact,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlPostalAddress {
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlContact {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlContent {
    pub packages: Vec<DhlPackage>,
    pub is_customs_declarable: bool,
    pub declared_value: Decimal,
    pub declared_value_currency: String,
    pub description: String,
    pub unit_of_measurement: String,
    pub incoterm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_declaration: Option<DhlExportDeclaration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlPackage {
    pub weight: Decimal,
    pub dimensions: DhlDimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_references: Option<Vec<DhlReference>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlReference {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlExportDeclaration {
    pub line_items: Vec<DhlLineItem>,
    pub invoice: DhlInvoice,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlInvoice {
    pub number: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlLineItem {
    pub number: u32,
    pub description: String,
    pub price: Decimal,
    pub quantity: DhlQuantity,
    pub weight: DhlItemWeight,
    pub manufacturer_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity_codes: Option<Vec<DhlCommodityCode>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlQuantity {
    pub value: u32,
    pub unit_of_measurement: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlItemWeight {
    pub net_value: Decimal,
    pub gross_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlCommodityCode {
    pub type_code: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlShipmentResponse {
    pub shipment_tracking_number: String,
    #[serde(default)]
    pub documents: Vec<DhlDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlDocument {
    pub image_format: String,
    pub content: String,
    pub type_code: String,
}

/// RFC 7807 problem document DHL returns on rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub additional_details: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlTrackingResponse {
    #[serde(default)]
    pub shipments: Vec<DhlTrackedShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlTrackedShipment {
    pub shipment_tracking_number: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_delivery_date: Option<String>,
    #[serde(default)]
    pub events: Vec<DhlTrackingEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhlTrackingEvent {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub description: String,
    #[serde(default)]
    pub service_area: Option<String>,
}

impl DhlParty {
    pub fn from_party(party: &ShippingParty) -> Self {
        Self {
            postal_address: DhlPostalAddress {
                address_line1: party.line1.clone(),
                address_line2: party.line2.clone(),
                city_name: party.city.clone(),
                province_code: party.state.clone(),
                postal_code: party.postal_code.clone(),
                country_code: party.country_code.clone(),
            },
            contact_information: DhlContact {
                full_name: party.name.clone(),
                company_name: party.company.clone(),
                phone: party.phone.clone(),
                email: party.email.clone(),
            },
        }
    }
}

impl DhlShipmentRequest {
    /// Map a canonical request onto the MyDHL shipment payload.
    pub fn from_canonical(request: &CanonicalShipmentRequest, account: Option<&str>) -> Self {
        let international = request.is_international();

        let packages = request
            .packages
            .iter()
            .map(|p| DhlPackage {
                weight: p.weight,
                dimensions: DhlDimensions {
                    length: p.length,
                    width: p.width,
                    height: p.height,
                },
                customer_references: Some(vec![DhlReference {
                    value: request.reference.clone(),
                }]),
            })
            .collect();

        let export_declaration = international.then(|| DhlExportDeclaration {
            line_items: request
                .commodities
                .iter()
                .enumerate()
                .map(|(i, c)| DhlLineItem {
                    number: i as u32 + 1,
                    description: c.description.clone(),
                    price: c.unit_value,
                    quantity: DhlQuantity {
                        value: c.quantity,
                        unit_of_measurement: "PCS".to_string(),
                    },
                    weight: DhlItemWeight {
                        net_value: c.unit_weight,
                        gross_value: c.unit_weight,
                    },
                    manufacturer_country: c.origin_country.clone(),
                    commodity_codes: c.tariff_code.as_ref().map(|code| {
                        vec![DhlCommodityCode {
                            type_code: "outbound".to_string(),
                            value: code.clone(),
                        }]
                    }),
                })
                .collect(),
            invoice: DhlInvoice {
                number: request.reference.clone(),
                date: request.ship_date.format("%Y-%m-%d").to_string(),
            },
        });

        let description = request
            .commodities
            .first()
            .map(|c| c.description.clone())
            .unwrap_or_else(|| "Merchandise".to_string());

        Self {
            planned_shipping_date_and_time: format!(
                "{}T12:00:00 GMT+00:00",
                request.ship_date.format("%Y-%m-%d")
            ),
            pickup: DhlPickup {
                is_requested: false,
            },
            product_code: request.service_code.clone(),
            accounts: account
                .map(|number| {
                    vec![DhlAccount {
                        type_code: "shipper".to_string(),
                        number: number.to_string(),
                    }]
                })
                .unwrap_or_default(),
            customer_details: DhlCustomerDetails {
                shipper_details: DhlParty::from_party(&request.sender),
                receiver_details: DhlParty::from_party(&request.recipient),
            },
            content: DhlContent {
                packages,
                is_customs_declarable: international,
                declared_value: request.declared_value,
                declared_value_currency: request.currency.clone(),
                description,
                unit_of_measurement: "metric".to_string(),
                incoterm: "DAP".to_string(),
                export_declaration,
            },
        }
    }
}
