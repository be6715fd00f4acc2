//! Normalized carrier response types and carrier identity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shipment::LabelArtifact;

/// Identifies one of the supported carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierCode {
    Dhl,
    Fedex,
    Ups,
    Myus,
}

impl CarrierCode {
    /// Stable lowercase code, matching the serde representation and the
    /// `carrier_code` column of carrier-service records.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarrierCode::Dhl => "dhl",
            CarrierCode::Fedex => "fedex",
            CarrierCode::Ups => "ups",
            CarrierCode::Myus => "myus",
        }
    }

    /// Operator-facing display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            CarrierCode::Dhl => "DHL Express",
            CarrierCode::Fedex => "FedEx",
            CarrierCode::Ups => "UPS",
            CarrierCode::Myus => "MyUS",
        }
    }

    /// Parse a stored code. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dhl" => Some(CarrierCode::Dhl),
            "fedex" => Some(CarrierCode::Fedex),
            "ups" => Some(CarrierCode::Ups),
            "myus" => Some(CarrierCode::Myus),
            _ => None,
        }
    }
}

impl fmt::Display for CarrierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static information about a gateway instance.
#[derive(Debug, Clone)]
pub struct CarrierInfo {
    pub code: CarrierCode,
    pub display_name: String,
    /// Whether the gateway implements tracking lookups
    pub supports_tracking: bool,
}

impl CarrierInfo {
    pub fn new(code: CarrierCode) -> Self {
        Self {
            code,
            display_name: code.display_name().to_string(),
            supports_tracking: true,
        }
    }
}

/// A field-level error reported by a carrier alongside a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierApiError {
    pub code: Option<String>,
    pub message: String,
    /// The request field the carrier attributed the error to, when given
    pub field: Option<String>,
}

impl CarrierApiError {
    /// Flatten into the detail strings carried on classified errors.
    pub fn detail_string(&self) -> String {
        match (&self.code, &self.field) {
            (Some(code), Some(field)) => format!("[{code}] {field}: {}", self.message),
            (Some(code), None) => format!("[{code}] {}", self.message),
            (None, Some(field)) => format!("{field}: {}", self.message),
            (None, None) => self.message.clone(),
        }
    }
}

/// Normalized outcome of a `create_shipment` call.
///
/// `success = false` is an ordinary business rejection: the carrier
/// understood the request and refused it. Transport faults never construct
/// this type; they surface as [`CarrierError`](super::error::CarrierError).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierResponse {
    pub success: bool,
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelArtifact>,
    /// Raw provider payload, kept for operator diagnosis
    pub raw: Option<serde_json::Value>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<CarrierApiError>,
}

impl CarrierResponse {
    /// Successful creation with tracking and label data.
    pub fn submitted(
        tracking_number: impl Into<String>,
        labels: Vec<LabelArtifact>,
        raw: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: true,
            tracking_number: Some(tracking_number.into()),
            labels,
            raw,
            error_message: None,
            errors: Vec::new(),
        }
    }

    /// Business rejection with the carrier's own words.
    pub fn rejected(
        message: impl Into<String>,
        errors: Vec<CarrierApiError>,
        raw: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            tracking_number: None,
            labels: Vec::new(),
            raw,
            error_message: Some(message.into()),
            errors,
        }
    }

    /// Structured detail strings for classification and persistence.
    pub fn detail_strings(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.detail_string()).collect()
    }
}

/// One scan event on a tracked shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
    pub location: Option<String>,
}

/// Normalized outcome of a `track` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub tracking_number: String,
    /// Carrier's own status wording, not normalized
    pub status: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_code_round_trip() {
        for code in [
            CarrierCode::Dhl,
            CarrierCode::Fedex,
            CarrierCode::Ups,
            CarrierCode::Myus,
        ] {
            assert_eq!(CarrierCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(CarrierCode::parse("DHL"), Some(CarrierCode::Dhl));
        assert_eq!(CarrierCode::parse("pigeon"), None);
    }

    #[test]
    fn test_response_constructors() {
        let ok = CarrierResponse::submitted("1Z999", Vec::new(), None);
        assert!(ok.success);
        assert_eq!(ok.tracking_number.as_deref(), Some("1Z999"));
        assert!(ok.error_message.is_none());

        let no = CarrierResponse::rejected(
            "address invalid",
            vec![CarrierApiError {
                code: Some("AV100".to_string()),
                message: "postal code mismatch".to_string(),
                field: Some("recipient.postalCode".to_string()),
            }],
            None,
        );
        assert!(!no.success);
        assert!(no.tracking_number.is_none());
        assert_eq!(
            no.detail_strings(),
            vec!["[AV100] recipient.postalCode: postal code mismatch"]
        );
    }
}
