//! DHL Express gateway implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::carrier::config::CarrierConfig;
use crate::carrier::error::{CarrierError, CarrierResult};
use crate::carrier::http::{basic_credentials, HttpClient, JsonResponse, RequestAuth};
use crate::carrier::traits::CarrierGateway;
use crate::carrier::types::{
    CarrierApiError, CarrierCode, CarrierInfo, CarrierResponse, TrackingEvent, TrackingResponse,
};
use crate::request::CanonicalShipmentRequest;
use crate::shipment::LabelArtifact;

use super::types::{DhlProblem, DhlShipmentRequest, DhlShipmentResponse, DhlTrackingResponse};

/// DHL Express gateway over the MyDHL API.
pub struct DhlGateway {
    info: CarrierInfo,
    client: HttpClient,
    auth: RequestAuth,
    account_number: Option<String>,
}

impl DhlGateway {
    /// Build a gateway from configuration. Credentials come from the
    /// environment variables named in the config.
    pub fn new(config: CarrierConfig) -> CarrierResult<Self> {
        let api_key = config.auth.load_api_key().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "DHL API key not found in env {}",
                config.auth.api_key_env
            ))
        })?;
        let api_secret = config.auth.load_api_secret().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "DHL API secret not found in env {}",
                config.auth.api_secret_env
            ))
        })?;

        let client = HttpClient::new(config.rest.base_url.clone(), config.rest.timeout())?;

        Ok(Self {
            info: CarrierInfo::new(CarrierCode::Dhl),
            client,
            auth: RequestAuth::Basic(basic_credentials(&api_key, &api_secret)),
            account_number: config.account_number,
        })
    }

    /// Extract a business rejection from a non-2xx MyDHL response.
    fn rejection(&self, response: &JsonResponse) -> CarrierResponse {
        let (message, details) = match response.decode::<DhlProblem>() {
            Ok(problem) => {
                let message = problem
                    .detail
                    .or(problem.title)
                    .unwrap_or_else(|| format!("HTTP {}", response.status.as_u16()));
                let details = problem
                    .additional_details
                    .into_iter()
                    .map(|message| CarrierApiError {
                        code: None,
                        message,
                        field: None,
                    })
                    .collect();
                (message, details)
            }
            Err(_) => (format!("HTTP {}", response.status.as_u16()), Vec::new()),
        };

        CarrierResponse::rejected(message, details, Some(response.body.clone()))
    }
}

#[async_trait]
impl CarrierGateway for DhlGateway {
    fn info(&self) -> &CarrierInfo {
        &self.info
    }

    async fn authenticate(&self) -> CarrierResult<()> {
        // MyDHL has no dedicated auth endpoint; a products query exercises
        // the Basic credentials. 401/403 surface as Authentication errors
        // from the HTTP layer; any other answer means the credentials work.
        let _ = self
            .client
            .get_json("/products?countryCode=US", &self.auth)
            .await?;
        debug!("DHL credentials verified");
        Ok(())
    }

    async fn create_shipment(
        &self,
        request: &CanonicalShipmentRequest,
    ) -> CarrierResult<CarrierResponse> {
        let payload = DhlShipmentRequest::from_canonical(request, self.account_number.as_deref());

        let response = self
            .client
            .post_json("/shipments", &self.auth, &payload)
            .await?;

        if !response.is_success() {
            return Ok(self.rejection(&response));
        }

        let parsed: DhlShipmentResponse = response.decode()?;
        info!(
            tracking_number = %parsed.shipment_tracking_number,
            "DHL shipment created"
        );

        let labels = parsed
            .documents
            .into_iter()
            .map(|doc| LabelArtifact {
                kind: match doc.type_code.as_str() {
                    "label" => "label".to_string(),
                    "invoice" => "customs_invoice".to_string(),
                    other => other.to_string(),
                },
                format: doc.image_format,
                content: doc.content,
            })
            .collect();

        Ok(CarrierResponse::submitted(
            parsed.shipment_tracking_number,
            labels,
            Some(response.body),
        ))
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse> {
        let response = self
            .client
            .get_json(
                &format!("/shipments/{tracking_number}/tracking"),
                &self.auth,
            )
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Request(format!(
                "DHL tracking lookup failed with HTTP {}",
                response.status.as_u16()
            )));
        }

        let parsed: DhlTrackingResponse = response.decode()?;
        let shipment = parsed
            .shipments
            .into_iter()
            .next()
            .ok_or_else(|| CarrierError::Parse("empty DHL tracking response".to_string()))?;

        Ok(TrackingResponse {
            tracking_number: shipment.shipment_tracking_number,
            status: shipment.status,
            estimated_delivery: shipment
                .estimated_delivery_date
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            events: shipment
                .events
                .into_iter()
                .map(|e| TrackingEvent {
                    timestamp: None,
                    description: match (&e.date, &e.time) {
                        (Some(date), Some(time)) => {
                            format!("{} ({date} {time})", e.description)
                        }
                        _ => e.description.clone(),
                    },
                    location: e.service_area,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::measure::{DimensionUnit, WeightUnit};
    use crate::request::{Commodity, RequestPackage, ShippingParty};

    fn party(country: &str) -> ShippingParty {
        ShippingParty {
            name: "Dana Smith".to_string(),
            company: None,
            line1: "12 Elm St".to_string(),
            line2: None,
            city: "Portland".to_string(),
            state: Some("OR".to_string()),
            postal_code: Some("97201".to_string()),
            country_code: country.to_string(),
            phone: None,
            email: None,
        }
    }

    fn canonical(recipient_country: &str) -> CanonicalShipmentRequest {
        CanonicalShipmentRequest {
            sender: party("US"),
            recipient: party(recipient_country),
            packages: vec![RequestPackage {
                weight: dec!(4.409),
                weight_unit: WeightUnit::Kilogram,
                length: dec!(30),
                width: dec!(20),
                height: dec!(10),
                dimension_unit: DimensionUnit::Centimeter,
            }],
            commodities: vec![Commodity {
                description: "Wool sweater".to_string(),
                quantity: 2,
                unit_value: dec!(39.95),
                unit_weight: dec!(0.9),
                weight_unit: WeightUnit::Kilogram,
                origin_country: "PT".to_string(),
                tariff_code: Some("6110.11".to_string()),
            }],
            declared_value: dec!(79.90),
            currency: "USD".to_string(),
            service_code: "P".to_string(),
            reference: "ORD-2042".to_string(),
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        }
    }

    #[test]
    fn test_wire_mapping_domestic() {
        let payload = DhlShipmentRequest::from_canonical(&canonical("US"), Some("123456789"));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["productCode"], "P");
        assert_eq!(json["accounts"][0]["number"], "123456789");
        assert_eq!(json["content"]["isCustomsDeclarable"], false);
        assert!(json["content"]["exportDeclaration"].is_null());
        // Decimal measurements serialize as exact decimal strings.
        assert_eq!(json["content"]["packages"][0]["weight"], "4.409");
    }

    #[test]
    fn test_wire_mapping_international_adds_export_declaration() {
        let payload = DhlShipmentRequest::from_canonical(&canonical("DE"), None);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["content"]["isCustomsDeclarable"], true);
        let line_items = json["content"]["exportDeclaration"]["lineItems"]
            .as_array()
            .unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0]["number"], 1);
        assert_eq!(line_items[0]["manufacturerCountry"], "PT");
        assert_eq!(line_items[0]["commodityCodes"][0]["value"], "6110.11");
        assert!(json.get("accounts").is_none());
    }

    #[test]
    fn test_recipient_without_state_is_omitted_from_wire() {
        let mut request = canonical("DE");
        request.recipient.state = None;
        let payload = DhlShipmentRequest::from_canonical(&request, None);
        let json = serde_json::to_value(&payload).unwrap();

        let receiver = &json["customerDetails"]["receiverDetails"]["postalAddress"];
        assert!(receiver.get("provinceCode").is_none());
    }
}
