//! Wire types for the MyUS parcel-forwarding API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::request::{CanonicalShipmentRequest, ShippingParty};

#[derive(Debug, Serialize)]
pub struct MyusShipmentRequest {
    pub reference: String,
    pub service: String,
    pub ship_date: String,
    pub recipient: MyusRecipient,
    pub packages: Vec<MyusPackage>,
    pub customs_items: Vec<MyusCustomsItem>,
    pub declared_value: Decimal,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct MyusRecipient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MyusPackage {
    pub weight: Decimal,
    pub weight_unit: String,
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub dimension_unit: String,
}

#[derive(Debug, Serialize)]
pub struct MyusCustomsItem {
    pub description: String,
    pub quantity: u32,
    pub value: Decimal,
    pub weight: Decimal,
    pub origin_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyusShipmentResponse {
    pub tracking_number: String,
    #[serde(default)]
    pub label: Option<MyusLabel>,
}

#[derive(Debug, Deserialize)]
pub struct MyusLabel {
    pub format: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MyusErrorEnvelope {
    pub error: MyusError,
}

#[derive(Debug, Deserialize)]
pub struct MyusError {
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyusAccountResponse {
    pub account_id: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct MyusTrackingResponse {
    pub tracking_number: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub events: Vec<MyusTrackingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MyusTrackingEvent {
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl MyusRecipient {
    pub fn from_party(party: &ShippingParty) -> Self {
        Self {
            name: party.name.clone(),
            company: party.company.clone(),
            address_line1: party.line1.clone(),
            address_line2: party.line2.clone(),
            city: party.city.clone(),
            state: party.state.clone(),
            postal_code: party.postal_code.clone(),
            country: party.country_code.clone(),
            phone: party.phone.clone(),
            email: party.email.clone(),
        }
    }
}

impl MyusShipmentRequest {
    /// Map a canonical request onto the MyUS payload.
    pub fn from_canonical(request: &CanonicalShipmentRequest) -> Self {
        Self {
            reference: request.reference.clone(),
            service: request.service_code.clone(),
            ship_date: request.ship_date.format("%Y-%m-%d").to_string(),
            recipient: MyusRecipient::from_party(&request.recipient),
            packages: request
                .packages
                .iter()
                .map(|p| MyusPackage {
                    weight: p.weight,
                    weight_unit: p.weight_unit.code().to_string(),
                    length: p.length,
                    width: p.width,
                    height: p.height,
                    dimension_unit: p.dimension_unit.code().to_string(),
                })
                .collect(),
            customs_items: request
                .commodities
                .iter()
                .map(|c| MyusCustomsItem {
                    description: c.description.clone(),
                    quantity: c.quantity,
                    value: c.unit_value,
                    weight: c.unit_weight,
                    origin_country: c.origin_country.clone(),
                    hs_code: c.tariff_code.clone(),
                })
                .collect(),
            declared_value: request.declared_value,
            currency: request.currency.clone(),
        }
    }
}
