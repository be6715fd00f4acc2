//! Shared HTTP infrastructure for carrier gateways.
//!
//! A thin reqwest wrapper that knows the carrier-agnostic parts of HTTP
//! error handling: connect/timeout mapping, credential rejection (401/403),
//! throttling (429 + Retry-After), and outage (5xx). Everything else,
//! including carrier-specific rejection payloads on 4xx, is handed back to
//! the gateway as a [`JsonResponse`] so each variant can interpret its own
//! wire format.

use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{CarrierError, CarrierResult};

/// Per-request authentication, chosen by each gateway.
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// No credentials (e.g. OAuth token endpoints authenticate in the body)
    None,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic <base64(user:pass)>`
    Basic(String),
    /// A custom header, e.g. `X-Api-Key`
    Header(&'static str, String),
}

/// An HTTP response with transport-level faults already filtered out.
///
/// Statuses that survive to here are success or carrier-interpretable
/// rejections (400/404/422...).
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl JsonResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body into a typed response.
    pub fn decode<T: DeserializeOwned>(&self) -> CarrierResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| CarrierError::Parse(format!("{e} - body: {}", self.body)))
    }
}

/// HTTP client shared by the gateway variants.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for one carrier endpoint.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CarrierResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CarrierError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// JSON GET.
    pub async fn get_json(&self, path: &str, auth: &RequestAuth) -> CarrierResult<JsonResponse> {
        self.send(Method::GET, path, auth, RequestBody::Empty).await
    }

    /// JSON POST.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        auth: &RequestAuth,
        body: &B,
    ) -> CarrierResult<JsonResponse> {
        let value = serde_json::to_value(body)
            .map_err(|e| CarrierError::Request(format!("failed to encode request body: {e}")))?;
        self.send(Method::POST, path, auth, RequestBody::Json(value))
            .await
    }

    /// Form-encoded POST (OAuth token endpoints).
    pub async fn post_form(
        &self,
        path: &str,
        auth: &RequestAuth,
        form: &[(&str, &str)],
    ) -> CarrierResult<JsonResponse> {
        let encoded: Vec<(String, String)> = form
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.send(Method::POST, path, auth, RequestBody::Form(encoded))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth: &RequestAuth,
        body: RequestBody,
    ) -> CarrierResult<JsonResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "carrier request");

        let mut request = self.client.request(method, &url);

        request = match auth {
            RequestAuth::None => request,
            RequestAuth::Bearer(token) => request.bearer_auth(token),
            RequestAuth::Basic(encoded) => {
                request.header(header::AUTHORIZATION, format!("Basic {encoded}"))
            }
            RequestAuth::Header(name, value) => request.header(*name, value.as_str()),
        };

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(pairs) => request.form(&pairs),
        };

        let response = request.send().await.map_err(CarrierError::from_http)?;
        self.handle_response(response).await
    }

    /// Filter transport-level statuses; pass the rest through for the
    /// gateway to interpret.
    async fn handle_response(&self, response: Response) -> CarrierResult<JsonResponse> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(CarrierError::RateLimited { retry_after });
        }

        let text = response
            .text()
            .await
            .map_err(|e| CarrierError::Request(format!("failed to read response body: {e}")))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CarrierError::Authentication(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        if status.is_server_error() {
            return Err(CarrierError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        // Rejection bodies are not always valid JSON; keep the raw text so
        // gateways can still surface it.
        let body = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::Value::String(text.clone()));

        if status.is_success() && body.is_string() && !text.trim().is_empty() {
            return Err(CarrierError::Parse(format!(
                "expected JSON body, got: {text}"
            )));
        }

        Ok(JsonResponse { status, body })
    }
}

enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Base64-encode `user:pass` for Basic authentication.
pub fn basic_credentials(user: &str, password: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    STANDARD.encode(format!("{user}:{password}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_credentials() {
        // RFC 7617 example
        assert_eq!(
            basic_credentials("Aladdin", "open sesame"),
            "QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn test_json_response_decode() {
        #[derive(serde::Deserialize)]
        struct Out {
            value: i32,
        }

        let response = JsonResponse {
            status: StatusCode::OK,
            body: serde_json::json!({ "value": 7 }),
        };
        assert!(response.is_success());
        assert_eq!(response.decode::<Out>().unwrap().value, 7);

        let bad = JsonResponse {
            status: StatusCode::OK,
            body: serde_json::json!({ "other": true }),
        };
        assert!(matches!(bad.decode::<Out>(), Err(CarrierError::Parse(_))));
    }
}
