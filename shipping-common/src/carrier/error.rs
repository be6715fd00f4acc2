//! Transport-level carrier errors.
//!
//! These cover everything that prevents a usable carrier answer: connection
//! failures, timeouts, credential rejections, throttling, outages, and
//! unparseable responses. A carrier that answers "no" is NOT an error here;
//! that is a business rejection carried in
//! [`CarrierResponse`](super::types::CarrierResponse).
//!
//! Display strings deliberately contain the classifier's keywords (timeout,
//! connection, authentication, rate limit, unavailable) so that
//! message-based classification of a stringified fault lands in the same
//! category as the typed classification.

use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorCategory, ErrorClassification};

/// Result type for gateway operations.
pub type CarrierResult<T> = Result<T, CarrierError>;

/// Errors raised by carrier gateways for transport and infrastructure
/// faults.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum CarrierError {
    /// Could not reach the carrier at all
    #[error("Connection error: {0}")]
    Connection(String),

    /// The carrier did not answer within the allowed time
    #[error("Timeout waiting for carrier: {0}")]
    Timeout(String),

    /// The carrier rejected our credentials
    #[error("Authentication rejected by carrier: {0}")]
    Authentication(String),

    /// The carrier throttled the request
    #[error("Rate limit exceeded at carrier: retry after {retry_after:?}")]
    RateLimited {
        /// Carrier-suggested wait, when the response carried one
        retry_after: Option<Duration>,
    },

    /// The carrier is down or degraded (HTTP 5xx)
    #[error("Carrier service unavailable: {0}")]
    Unavailable(String),

    /// The response arrived but could not be decoded
    #[error("Failed to parse carrier response: {0}")]
    Parse(String),

    /// Request construction or other client-side HTTP failure
    #[error("Carrier request failed: {0}")]
    Request(String),

    /// Missing or invalid local gateway configuration
    #[error("Carrier configuration error: {0}")]
    Configuration(String),
}

impl ErrorClassification for CarrierError {
    fn category(&self) -> ErrorCategory {
        match self {
            CarrierError::Connection(_) => ErrorCategory::NetworkError,
            CarrierError::Timeout(_) => ErrorCategory::NetworkError,
            CarrierError::Authentication(_) => ErrorCategory::AuthError,
            CarrierError::RateLimited { .. } => ErrorCategory::RateLimited,
            CarrierError::Unavailable(_) => ErrorCategory::ServiceUnavailable,
            CarrierError::Parse(_) => ErrorCategory::ApiError,
            CarrierError::Request(_) => ErrorCategory::NetworkError,
            CarrierError::Configuration(_) => ErrorCategory::SystemError,
        }
    }
}

impl CarrierError {
    /// Map a reqwest failure onto the transport taxonomy.
    pub fn from_http(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CarrierError::Timeout(err.to_string())
        } else if err.is_connect() {
            CarrierError::Connection(err.to_string())
        } else {
            CarrierError::Request(err.to_string())
        }
    }
}
