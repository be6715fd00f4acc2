//! Fixed error categories and the classification trait.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of submission failures for operator handling.
///
/// The category names are stable wire values: they are persisted into the
/// shipment's `carrier_errors` record and read back by operator tooling,
/// so variants serialize as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Carrier rejected our credentials (API key, OAuth token, account)
    AuthError,
    /// Carrier rejected the recipient or sender address
    AddressValidation,
    /// Carrier rejected package weight or dimensions
    PackageValidation,
    /// Carrier throttled the request
    RateLimited,
    /// Transport-level failure (timeout, connection refused/reset)
    NetworkError,
    /// Carrier service is down or degraded
    ServiceUnavailable,
    /// Carrier returned an error we could not classify further
    ApiError,
    /// Carrier rejected the shipment with no classifiable detail
    ApiRejection,
    /// Local or infrastructure fault before/around the carrier call
    SystemError,
}

impl ErrorCategory {
    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::AuthError => "auth_error",
            ErrorCategory::AddressValidation => "address_validation",
            ErrorCategory::PackageValidation => "package_validation",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::ServiceUnavailable => "service_unavailable",
            ErrorCategory::ApiError => "api_error",
            ErrorCategory::ApiRejection => "api_rejection",
            ErrorCategory::SystemError => "system_error",
        }
    }

    /// Fixed retry-eligibility table.
    ///
    /// Transient conditions (network, throttling, carrier outage) and local
    /// faults where the carrier was never provably reached are safe to
    /// resubmit manually. Everything the carrier actively rejected is not:
    /// resubmitting unchanged input would fail the same way.
    pub fn can_retry(&self) -> bool {
        matches!(
            self,
            ErrorCategory::NetworkError
                | ErrorCategory::RateLimited
                | ErrorCategory::ServiceUnavailable
                | ErrorCategory::SystemError
        )
    }

    /// Parse a stored wire name back into a category.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auth_error" => Some(ErrorCategory::AuthError),
            "address_validation" => Some(ErrorCategory::AddressValidation),
            "package_validation" => Some(ErrorCategory::PackageValidation),
            "rate_limited" => Some(ErrorCategory::RateLimited),
            "network_error" => Some(ErrorCategory::NetworkError),
            "service_unavailable" => Some(ErrorCategory::ServiceUnavailable),
            "api_error" => Some(ErrorCategory::ApiError),
            "api_rejection" => Some(ErrorCategory::ApiRejection),
            "system_error" => Some(ErrorCategory::SystemError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for errors that can classify themselves into the fixed taxonomy.
///
/// Implemented by transport-level error enums so the orchestrator can map a
/// fault to a persisted category without inspecting concrete types.
pub trait ErrorClassification {
    /// Returns the category of this error.
    fn category(&self) -> ErrorCategory;

    /// Returns true if manual resubmission may succeed.
    fn can_retry(&self) -> bool {
        self.category().can_retry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_table() {
        assert!(ErrorCategory::NetworkError.can_retry());
        assert!(ErrorCategory::RateLimited.can_retry());
        assert!(ErrorCategory::ServiceUnavailable.can_retry());
        assert!(ErrorCategory::SystemError.can_retry());

        assert!(!ErrorCategory::AuthError.can_retry());
        assert!(!ErrorCategory::AddressValidation.can_retry());
        assert!(!ErrorCategory::PackageValidation.can_retry());
        assert!(!ErrorCategory::ApiError.can_retry());
        assert!(!ErrorCategory::ApiRejection.can_retry());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&ErrorCategory::AddressValidation).unwrap();
        assert_eq!(json, "\"address_validation\"");

        let back: ErrorCategory = serde_json::from_str("\"auth_error\"").unwrap();
        assert_eq!(back, ErrorCategory::AuthError);
    }

    #[test]
    fn test_parse_round_trip() {
        for cat in [
            ErrorCategory::AuthError,
            ErrorCategory::AddressValidation,
            ErrorCategory::PackageValidation,
            ErrorCategory::RateLimited,
            ErrorCategory::NetworkError,
            ErrorCategory::ServiceUnavailable,
            ErrorCategory::ApiError,
            ErrorCategory::ApiRejection,
            ErrorCategory::SystemError,
        ] {
            assert_eq!(ErrorCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(ErrorCategory::parse("bogus"), None);
    }
}
