//! Canonical request DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::measure::{DimensionUnit, WeightUnit};

/// One side of a shipment: a postal address plus contact details, already
/// filtered through the per-country address rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingParty {
    pub name: String,
    pub company: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    /// Omitted entirely for countries whose carriers reject it
    pub state: Option<String>,
    /// Omitted entirely for countries without postal codes
    pub postal_code: Option<String>,
    pub country_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A package entry with normalized, exact measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPackage {
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub dimension_unit: DimensionUnit,
}

/// A customs commodity line, flattened from package items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub description: String,
    pub quantity: u32,
    /// Per-unit declared value in the request currency
    pub unit_value: Decimal,
    /// Per-unit weight
    pub unit_weight: Decimal,
    pub weight_unit: WeightUnit,
    /// ISO country of origin
    pub origin_country: String,
    /// Harmonized tariff code, when known
    pub tariff_code: Option<String>,
}

/// The carrier-agnostic shipment request. Ephemeral: built per attempt,
/// handed to exactly one gateway, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalShipmentRequest {
    pub sender: ShippingParty,
    pub recipient: ShippingParty,
    /// Ordered as the source packages were ordered
    pub packages: Vec<RequestPackage>,
    /// Ordered as the source items were ordered, package by package
    pub commodities: Vec<Commodity>,
    /// Total declared value in `currency`
    pub declared_value: Decimal,
    /// ISO 4217 currency code
    pub currency: String,
    /// The carrier API's identifier for the requested service level
    pub service_code: String,
    /// Shipment reference shown on the label and in carrier portals
    pub reference: String,
    pub ship_date: NaiveDate,
}

impl CanonicalShipmentRequest {
    /// Total gross weight across packages (same unit as the packages).
    pub fn total_weight(&self) -> Decimal {
        self.packages.iter().map(|p| p.weight).sum()
    }

    /// True when any commodity crosses a customs border relative to the
    /// sender country.
    pub fn is_international(&self) -> bool {
        self.sender.country_code != self.recipient.country_code
    }
}
