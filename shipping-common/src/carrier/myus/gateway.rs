//! MyUS gateway implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::carrier::config::CarrierConfig;
use crate::carrier::error::{CarrierError, CarrierResult};
use crate::carrier::http::{HttpClient, JsonResponse, RequestAuth};
use crate::carrier::traits::CarrierGateway;
use crate::carrier::types::{
    CarrierApiError, CarrierCode, CarrierInfo, CarrierResponse, TrackingEvent, TrackingResponse,
};
use crate::request::CanonicalShipmentRequest;
use crate::shipment::LabelArtifact;

use super::types::{
    MyusAccountResponse, MyusErrorEnvelope, MyusShipmentRequest, MyusShipmentResponse,
    MyusTrackingResponse,
};

/// MyUS parcel-forwarding gateway.
pub struct MyusGateway {
    info: CarrierInfo,
    client: HttpClient,
    auth: RequestAuth,
}

impl MyusGateway {
    /// Build a gateway from configuration. The API key comes from the
    /// environment variable named in the config; MyUS has no secret pair.
    pub fn new(config: CarrierConfig) -> CarrierResult<Self> {
        let api_key = config.auth.load_api_key().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "MyUS API key not found in env {}",
                config.auth.api_key_env
            ))
        })?;

        let client = HttpClient::new(config.rest.base_url.clone(), config.rest.timeout())?;

        Ok(Self {
            info: CarrierInfo::new(CarrierCode::Myus),
            client,
            auth: RequestAuth::Header("X-Api-Key", api_key),
        })
    }

    /// Extract a business rejection from a non-2xx response.
    fn rejection(&self, response: &JsonResponse) -> CarrierResponse {
        match response.decode::<MyusErrorEnvelope>() {
            Ok(envelope) => {
                let details = envelope
                    .error
                    .details
                    .into_iter()
                    .map(|message| CarrierApiError {
                        code: None,
                        message,
                        field: None,
                    })
                    .collect();
                CarrierResponse::rejected(envelope.error.message, details, Some(response.body.clone()))
            }
            Err(_) => CarrierResponse::rejected(
                format!("HTTP {}", response.status.as_u16()),
                Vec::new(),
                Some(response.body.clone()),
            ),
        }
    }
}

#[async_trait]
impl CarrierGateway for MyusGateway {
    fn info(&self) -> &CarrierInfo {
        &self.info
    }

    async fn authenticate(&self) -> CarrierResult<()> {
        let response = self.client.get_json("/v1/account", &self.auth).await?;

        if !response.is_success() {
            return Err(CarrierError::Authentication(format!(
                "MyUS account lookup failed: {}",
                response.body
            )));
        }

        let account: MyusAccountResponse = response.decode()?;
        if !account.active {
            return Err(CarrierError::Authentication(format!(
                "MyUS account {} is inactive",
                account.account_id
            )));
        }

        debug!(account_id = %account.account_id, "MyUS credentials verified");
        Ok(())
    }

    async fn create_shipment(
        &self,
        request: &CanonicalShipmentRequest,
    ) -> CarrierResult<CarrierResponse> {
        let payload = MyusShipmentRequest::from_canonical(request);

        let response = self
            .client
            .post_json("/v1/shipments", &self.auth, &payload)
            .await?;

        if !response.is_success() {
            return Ok(self.rejection(&response));
        }

        let parsed: MyusShipmentResponse = response.decode()?;
        info!(tracking_number = %parsed.tracking_number, "MyUS shipment created");

        let labels = parsed
            .label
            .map(|label| {
                vec![LabelArtifact {
                    kind: "label".to_string(),
                    format: label.format,
                    content: label.content,
                }]
            })
            .unwrap_or_default();

        Ok(CarrierResponse::submitted(
            parsed.tracking_number,
            labels,
            Some(response.body),
        ))
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse> {
        let response = self
            .client
            .get_json(&format!("/v1/tracking/{tracking_number}"), &self.auth)
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Request(format!(
                "MyUS tracking lookup failed with HTTP {}",
                response.status.as_u16()
            )));
        }

        let parsed: MyusTrackingResponse = response.decode()?;

        Ok(TrackingResponse {
            tracking_number: parsed.tracking_number,
            status: parsed.status,
            estimated_delivery: parsed
                .estimated_delivery
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            events: parsed
                .events
                .into_iter()
                .map(|e| TrackingEvent {
                    timestamp: None,
                    description: e.description,
                    location: e.location,
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

    fn canonical() -> CanonicalShipmentRequest {
        let party = ShippingParty {
            name: "Dana Smith".to_string(),
            company: None,
            line1: "12 Elm St".to_string(),
            line2: None,
            city: "Portland".to_string(),
            state: Some("OR".to_string()),
            postal_code: Some("97201".to_string()),
            country_code: "US".to_string(),
            phone: None,
            email: None,
        };
        CanonicalShipmentRequest {
            sender: party.clone(),
            recipient: party,
            packages: vec![RequestPackage {
                weight: dec!(2),
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
                tariff_code: None,
            }],
            declared_value: dec!(79.90),
            currency: "USD".to_string(),
            service_code: "express".to_string(),
            reference: "ORD-2042".to_string(),
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        }
    }

    #[test]
    fn test_wire_mapping() {
        let payload = MyusShipmentRequest::from_canonical(&canonical());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["service"], "express");
        assert_eq!(json["ship_date"], "2025-06-02");
        assert_eq!(json["recipient"]["country"], "US");
        assert_eq!(json["packages"][0]["weight_unit"], "KG");
        assert_eq!(json["customs_items"][0]["quantity"], 2);
        assert_eq!(json["declared_value"], "79.90");
    }
}
