//! FedEx gateway implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::carrier::config::CarrierConfig;
use crate::carrier::error::{CarrierError, CarrierResult};
use crate::carrier::http::{HttpClient, JsonResponse, RequestAuth};
use crate::carrier::oauth::TokenCache;
use crate::carrier::traits::CarrierGateway;
use crate::carrier::types::{
    CarrierApiError, CarrierCode, CarrierInfo, CarrierResponse, TrackingEvent, TrackingResponse,
};
use crate::request::CanonicalShipmentRequest;
use crate::shipment::LabelArtifact;

use super::types::{
    FedexErrorResponse, FedexShipmentRequest, FedexShipmentResponse, FedexTokenResponse,
    FedexTrackingInfo, FedexTrackingNumberInfo, FedexTrackingRequest, FedexTrackingResponse,
};

/// FedEx gateway over the Ship and Track APIs.
pub struct FedexGateway {
    info: CarrierInfo,
    client: HttpClient,
    client_id: String,
    client_secret: String,
    account_number: Option<String>,
    token: TokenCache,
}

impl FedexGateway {
    /// Build a gateway from configuration. Credentials come from the
    /// environment variables named in the config.
    pub fn new(config: CarrierConfig) -> CarrierResult<Self> {
        let client_id = config.auth.load_api_key().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "FedEx client id not found in env {}",
                config.auth.api_key_env
            ))
        })?;
        let client_secret = config.auth.load_api_secret().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "FedEx client secret not found in env {}",
                config.auth.api_secret_env
            ))
        })?;

        let client = HttpClient::new(config.rest.base_url.clone(), config.rest.timeout())?;

        Ok(Self {
            info: CarrierInfo::new(CarrierCode::Fedex),
            client,
            client_id,
            client_secret,
            account_number: config.account_number,
            token: TokenCache::new(),
        })
    }

    /// Fetch a fresh OAuth token and cache it.
    async fn fetch_token(&self) -> CarrierResult<String> {
        let response = self
            .client
            .post_form(
                "/oauth/token",
                &RequestAuth::None,
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                ],
            )
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Authentication(format!(
                "FedEx token request failed: {}",
                response.body
            )));
        }

        let parsed: FedexTokenResponse = response.decode()?;
        self.token
            .store(parsed.access_token.clone(), parsed.expires_in)
            .await;
        debug!("FedEx access token refreshed");
        Ok(parsed.access_token)
    }

    /// Cached token, refreshing when stale.
    async fn access_token(&self) -> CarrierResult<String> {
        if let Some(token) = self.token.get().await {
            return Ok(token);
        }
        self.fetch_token().await
    }

    /// Extract a business rejection from a non-2xx Ship API response.
    fn rejection(&self, response: &JsonResponse) -> CarrierResponse {
        let errors = response
            .decode::<FedexErrorResponse>()
            .map(|e| e.errors)
            .unwrap_or_default();

        let message = errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", response.status.as_u16()));

        let details = errors
            .into_iter()
            .map(|e| CarrierApiError {
                code: e.code,
                message: e.message,
                field: None,
            })
            .collect();

        CarrierResponse::rejected(message, details, Some(response.body.clone()))
    }
}

#[async_trait]
impl CarrierGateway for FedexGateway {
    fn info(&self) -> &CarrierInfo {
        &self.info
    }

    async fn authenticate(&self) -> CarrierResult<()> {
        self.fetch_token().await?;
        Ok(())
    }

    async fn create_shipment(
        &self,
        request: &CanonicalShipmentRequest,
    ) -> CarrierResult<CarrierResponse> {
        let token = self.access_token().await?;
        let payload = FedexShipmentRequest::from_canonical(request, self.account_number.as_deref());

        let response = self
            .client
            .post_json(
                "/ship/v1/shipments",
                &RequestAuth::Bearer(token),
                &payload,
            )
            .await?;

        if !response.is_success() {
            return Ok(self.rejection(&response));
        }

        let parsed: FedexShipmentResponse = response.decode()?;
        let shipment = parsed
            .output
            .transaction_shipments
            .into_iter()
            .next()
            .ok_or_else(|| {
                CarrierError::Parse("FedEx response contained no transaction shipments".to_string())
            })?;

        info!(
            tracking_number = %shipment.master_tracking_number,
            "FedEx shipment created"
        );

        let labels = shipment
            .piece_responses
            .into_iter()
            .flat_map(|piece| piece.package_documents)
            .filter_map(|doc| {
                doc.encoded_label.map(|content| LabelArtifact {
                    kind: match doc.doc_type.as_deref() {
                        Some("COMMERCIAL_INVOICE") => "customs_invoice".to_string(),
                        _ => "label".to_string(),
                    },
                    format: doc.content_type.unwrap_or_else(|| "PDF".to_string()),
                    content,
                })
            })
            .collect();

        Ok(CarrierResponse::submitted(
            shipment.master_tracking_number,
            labels,
            Some(response.body),
        ))
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse> {
        let token = self.access_token().await?;
        let payload = FedexTrackingRequest {
            include_detailed_scans: true,
            tracking_info: vec![FedexTrackingInfo {
                tracking_number_info: FedexTrackingNumberInfo {
                    tracking_number: tracking_number.to_string(),
                },
            }],
        };

        let response = self
            .client
            .post_json(
                "/track/v1/trackingnumbers",
                &RequestAuth::Bearer(token),
                &payload,
            )
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Request(format!(
                "FedEx tracking lookup failed with HTTP {}",
                response.status.as_u16()
            )));
        }

        let parsed: FedexTrackingResponse = response.decode()?;
        let result = parsed
            .output
            .complete_track_results
            .into_iter()
            .next()
            .ok_or_else(|| CarrierError::Parse("empty FedEx tracking response".to_string()))?;

        let track = result.track_results.into_iter().next();

        Ok(TrackingResponse {
            tracking_number: result.tracking_number,
            status: track
                .as_ref()
                .and_then(|t| t.latest_status_detail.as_ref())
                .and_then(|s| s.description.clone()),
            estimated_delivery: None,
            events: track
                .map(|t| {
                    t.scan_events
                        .into_iter()
                        .map(|e| TrackingEvent {
                            timestamp: None,
                            description: e.event_description.unwrap_or_default(),
                            location: e.scan_location.and_then(|l| match (l.city, l.country_code)
                            {
                                (Some(city), Some(country)) => Some(format!("{city}, {country}")),
                                (Some(city), None) => Some(city),
                                (None, Some(country)) => Some(country),
                                (None, None) => None,
                            }),
                        })
                        .collect()
                })
                .unwrap_or_default(),
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
            company: Some("Acme".to_string()),
            line1: "12 Elm St".to_string(),
            line2: Some("Suite 4".to_string()),
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
                weight_unit: WeightUnit::Pound,
                length: dec!(11.811),
                width: dec!(7.874),
                height: dec!(3.937),
                dimension_unit: DimensionUnit::Inch,
            }],
            commodities: vec![Commodity {
                description: "Wool sweater".to_string(),
                quantity: 2,
                unit_value: dec!(39.95),
                unit_weight: dec!(1.984),
                weight_unit: WeightUnit::Pound,
                origin_country: "PT".to_string(),
                tariff_code: None,
            }],
            declared_value: dec!(79.90),
            currency: "USD".to_string(),
            service_code: "INTERNATIONAL_PRIORITY".to_string(),
            reference: "ORD-2042".to_string(),
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        }
    }

    #[test]
    fn test_wire_mapping() {
        let payload = FedexShipmentRequest::from_canonical(&canonical("CA"), Some("740561073"));
        let json = serde_json::to_value(&payload).unwrap();

        let shipment = &json["requestedShipment"];
        assert_eq!(shipment["serviceType"], "INTERNATIONAL_PRIORITY");
        assert_eq!(shipment["shipDatestamp"], "2025-06-02");
        assert_eq!(
            shipment["requestedPackageLineItems"][0]["weight"]["units"],
            "LB"
        );
        assert_eq!(
            shipment["requestedPackageLineItems"][0]["weight"]["value"],
            "4.409"
        );
        assert_eq!(
            shipment["recipients"][0]["address"]["streetLines"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
        assert_eq!(json["accountNumber"]["value"], "740561073");

        let customs = &shipment["customsClearanceDetail"];
        assert_eq!(customs["totalCustomsValue"]["amount"], "79.90");
        assert_eq!(customs["commodities"][0]["customsValue"]["amount"], "79.90");
    }

    #[test]
    fn test_domestic_shipment_has_no_customs_detail() {
        let payload = FedexShipmentRequest::from_canonical(&canonical("US"), None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["requestedShipment"]
            .get("customsClearanceDetail")
            .is_none());
        assert!(json.get("accountNumber").is_none());
    }
}
