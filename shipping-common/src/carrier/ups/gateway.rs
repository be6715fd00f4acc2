//! UPS gateway implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::carrier::config::CarrierConfig;
use crate::carrier::error::{CarrierError, CarrierResult};
use crate::carrier::http::{basic_credentials, HttpClient, JsonResponse, RequestAuth};
use crate::carrier::oauth::TokenCache;
use crate::carrier::traits::CarrierGateway;
use crate::carrier::types::{
    CarrierApiError, CarrierCode, CarrierInfo, CarrierResponse, TrackingEvent, TrackingResponse,
};
use crate::request::CanonicalShipmentRequest;
use crate::shipment::LabelArtifact;

use super::types::{
    UpsErrorEnvelope, UpsShipRequest, UpsShipResponse, UpsTokenResponse, UpsTrackResponse,
};

/// UPS gateway over the Shipping and Track APIs.
pub struct UpsGateway {
    info: CarrierInfo,
    client: HttpClient,
    basic: String,
    account_number: String,
    token: TokenCache,
}

impl UpsGateway {
    /// Build a gateway from configuration. Credentials come from the
    /// environment variables named in the config; UPS additionally requires
    /// a shipper account number for billing.
    pub fn new(config: CarrierConfig) -> CarrierResult<Self> {
        let client_id = config.auth.load_api_key().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "UPS client id not found in env {}",
                config.auth.api_key_env
            ))
        })?;
        let client_secret = config.auth.load_api_secret().ok_or_else(|| {
            CarrierError::Configuration(format!(
                "UPS client secret not found in env {}",
                config.auth.api_secret_env
            ))
        })?;
        let account_number = config.account_number.clone().ok_or_else(|| {
            CarrierError::Configuration("UPS shipper account number is not configured".to_string())
        })?;

        let client = HttpClient::new(config.rest.base_url.clone(), config.rest.timeout())?;

        Ok(Self {
            info: CarrierInfo::new(CarrierCode::Ups),
            client,
            basic: basic_credentials(&client_id, &client_secret),
            account_number,
            token: TokenCache::new(),
        })
    }

    /// Fetch a fresh OAuth token and cache it.
    async fn fetch_token(&self) -> CarrierResult<String> {
        let response = self
            .client
            .post_form(
                "/security/v1/oauth/token",
                &RequestAuth::Basic(self.basic.clone()),
                &[("grant_type", "client_credentials")],
            )
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Authentication(format!(
                "UPS token request failed: {}",
                response.body
            )));
        }

        let parsed: UpsTokenResponse = response.decode()?;
        let expires_in = parsed.expires_in.parse::<u64>().unwrap_or(600);
        self.token
            .store(parsed.access_token.clone(), expires_in)
            .await;
        debug!("UPS access token refreshed");
        Ok(parsed.access_token)
    }

    /// Cached token, refreshing when stale.
    async fn access_token(&self) -> CarrierResult<String> {
        if let Some(token) = self.token.get().await {
            return Ok(token);
        }
        self.fetch_token().await
    }

    /// Extract a business rejection from a non-2xx Shipping API response.
    fn rejection(&self, response: &JsonResponse) -> CarrierResponse {
        let errors = response
            .decode::<UpsErrorEnvelope>()
            .map(|e| e.response.errors)
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
impl CarrierGateway for UpsGateway {
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
        let payload = UpsShipRequest::from_canonical(request, &self.account_number);

        let response = self
            .client
            .post_json(
                "/api/shipments/v1/ship",
                &RequestAuth::Bearer(token),
                &payload,
            )
            .await?;

        if !response.is_success() {
            return Ok(self.rejection(&response));
        }

        let parsed: UpsShipResponse = response.decode()?;
        let results = parsed.shipment_response.shipment_results;

        info!(
            tracking_number = %results.shipment_identification_number,
            "UPS shipment created"
        );

        let labels = results
            .package_results
            .into_iter()
            .filter_map(|package| package.shipping_label)
            .map(|label| LabelArtifact {
                kind: "label".to_string(),
                format: label
                    .image_format
                    .map(|f| f.code)
                    .unwrap_or_else(|| "GIF".to_string()),
                content: label.graphic_image,
            })
            .collect();

        Ok(CarrierResponse::submitted(
            results.shipment_identification_number,
            labels,
            Some(response.body),
        ))
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<TrackingResponse> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get_json(
                &format!("/api/track/v1/details/{tracking_number}"),
                &RequestAuth::Bearer(token),
            )
            .await?;

        if !response.is_success() {
            return Err(CarrierError::Request(format!(
                "UPS tracking lookup failed with HTTP {}",
                response.status.as_u16()
            )));
        }

        let parsed: UpsTrackResponse = response.decode()?;
        let package = parsed
            .track_response
            .shipment
            .into_iter()
            .flat_map(|s| s.package)
            .next()
            .ok_or_else(|| CarrierError::Parse("empty UPS tracking response".to_string()))?;

        let status = package
            .activity
            .first()
            .and_then(|a| a.status.as_ref())
            .and_then(|s| s.description.clone());

        Ok(TrackingResponse {
            tracking_number: package.tracking_number,
            status,
            estimated_delivery: None,
            events: package
                .activity
                .into_iter()
                .map(|a| TrackingEvent {
                    timestamp: None,
                    description: a
                        .status
                        .and_then(|s| s.description)
                        .unwrap_or_default(),
                    location: a.location.and_then(|l| l.address).and_then(|addr| {
                        match (addr.city, addr.country) {
                            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
                            (Some(city), None) => Some(city),
                            (None, Some(country)) => Some(country),
                            (None, None) => None,
                        }
                    }),
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
            phone: Some("+1 555 0100".to_string()),
            email: None,
        }
    }

    fn canonical() -> CanonicalShipmentRequest {
        CanonicalShipmentRequest {
            sender: party("US"),
            recipient: party("US"),
            packages: vec![RequestPackage {
                weight: dec!(4.409),
                weight_unit: WeightUnit::Pound,
                length: dec!(12),
                width: dec!(8),
                height: dec!(4),
                dimension_unit: DimensionUnit::Inch,
            }],
            commodities: vec![Commodity {
                description: "Wool sweater".to_string(),
                quantity: 1,
                unit_value: dec!(79.90),
                unit_weight: dec!(4.409),
                weight_unit: WeightUnit::Pound,
                origin_country: "PT".to_string(),
                tariff_code: None,
            }],
            declared_value: dec!(79.90),
            currency: "USD".to_string(),
            service_code: "03".to_string(),
            reference: "ORD-2042".to_string(),
            ship_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        }
    }

    #[test]
    fn test_wire_mapping() {
        let payload = UpsShipRequest::from_canonical(&canonical(), "A1B2C3");
        let json = serde_json::to_value(&payload).unwrap();

        let shipment = &json["ShipmentRequest"]["Shipment"];
        assert_eq!(shipment["Service"]["Code"], "03");
        assert_eq!(shipment["Shipper"]["ShipperNumber"], "A1B2C3");
        assert_eq!(
            shipment["PaymentInformation"]["ShipmentCharge"]["BillShipper"]["AccountNumber"],
            "A1B2C3"
        );
        // UPS takes numerics as strings.
        assert_eq!(shipment["Package"][0]["PackageWeight"]["Weight"], "4.409");
        assert_eq!(
            shipment["Package"][0]["PackageWeight"]["UnitOfMeasurement"]["Code"],
            "LBS"
        );
        assert_eq!(shipment["ReferenceNumber"]["Value"], "ORD-2042");
        // Domestic shipments omit the invoice line total.
        assert!(shipment.get("InvoiceLineTotal").is_none());
    }

    #[test]
    fn test_charge_type_field_name() {
        let payload = UpsShipRequest::from_canonical(&canonical(), "A1B2C3");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json["ShipmentRequest"]["Shipment"]["PaymentInformation"]["ShipmentCharge"]["Type"],
            "01"
        );
    }
}
