//! Keyword-cascade classification of raw carrier error text.
//!
//! Carriers return free-form error strings; the cascade below maps them to
//! the fixed taxonomy with an ordered, case-insensitive substring scan. The
//! first matching category wins, so the order of `CATEGORY_KEYWORDS` is
//! load-bearing: "connection to service lost" must land in `network_error`,
//! not `service_unavailable`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::ErrorCategory;

/// Ordered category cascade. First match wins.
const CATEGORY_KEYWORDS: &[(ErrorCategory, &[&str])] = &[
    (ErrorCategory::AuthError, &["authentication", "credential"]),
    (
        ErrorCategory::AddressValidation,
        &["address", "postal", "city"],
    ),
    (
        ErrorCategory::PackageValidation,
        &["weight", "dimension"],
    ),
    (ErrorCategory::RateLimited, &["rate limit", "throttl"]),
    (ErrorCategory::NetworkError, &["timeout", "connection"]),
    (
        ErrorCategory::ServiceUnavailable,
        &["service", "unavailable"],
    ),
];

/// Operator-facing phrases, keyed independently of the category cascade so
/// the friendly text can be more specific than the category.
const FRIENDLY_PHRASES: &[(&str, &str)] = &[
    (
        "authentication",
        "The carrier rejected our credentials. Verify the API keys configured for this carrier.",
    ),
    (
        "credential",
        "The carrier rejected our credentials. Verify the API keys configured for this carrier.",
    ),
    (
        "address",
        "The carrier could not validate the recipient address. Check street, city, and postal code.",
    ),
    (
        "postal",
        "The carrier rejected the postal code. Confirm it matches the destination country format.",
    ),
    (
        "city",
        "The carrier could not match the city to the postal code.",
    ),
    (
        "weight",
        "The carrier rejected the package weight. Re-check measured weights against service limits.",
    ),
    (
        "dimension",
        "The carrier rejected the package dimensions. Re-check measurements against service limits.",
    ),
    (
        "rate limit",
        "The carrier is throttling our requests. Wait a few minutes and resubmit.",
    ),
    (
        "throttl",
        "The carrier is throttling our requests. Wait a few minutes and resubmit.",
    ),
    (
        "timeout",
        "The carrier did not respond in time. The shipment was not created; resubmit when ready.",
    ),
    (
        "connection",
        "We could not reach the carrier. The shipment was not created; resubmit when ready.",
    ),
    (
        "unavailable",
        "The carrier service is temporarily unavailable. Resubmit later.",
    ),
];

const FRIENDLY_FALLBACK: &str =
    "The carrier reported an error we could not interpret. Review the raw message below.";

/// A carrier or transport failure reduced to the fixed taxonomy.
///
/// This is the ephemeral form; the orchestrator persists it as the
/// shipment's `carrier_errors` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    /// Taxonomy category
    pub category: ErrorCategory,
    /// Operator-facing message
    pub message: String,
    /// Raw provider text, untouched
    pub raw_message: String,
    /// Structured field-level details reported by the carrier, if any
    pub details: Vec<String>,
    /// Fixed retry-eligibility flag for the category
    pub can_retry: bool,
    /// When classification happened
    pub classified_at: DateTime<Utc>,
}

impl ClassifiedError {
    /// Build a `system_error` record for local/infrastructure faults.
    pub fn system(raw_message: impl Into<String>) -> Self {
        let raw_message = raw_message.into();
        Self {
            category: ErrorCategory::SystemError,
            message: "An internal error interrupted submission. The shipment can be resubmitted."
                .to_string(),
            raw_message,
            details: Vec::new(),
            can_retry: ErrorCategory::SystemError.can_retry(),
            classified_at: Utc::now(),
        }
    }

    /// Build an `api_rejection` record for rejections with no message at all.
    pub fn bare_rejection() -> Self {
        Self {
            category: ErrorCategory::ApiRejection,
            message: "The carrier rejected the shipment without further detail.".to_string(),
            raw_message: String::new(),
            details: Vec::new(),
            can_retry: ErrorCategory::ApiRejection.can_retry(),
            classified_at: Utc::now(),
        }
    }
}

/// Classify raw carrier error text.
///
/// Total over all inputs: an unmatched non-empty string classifies as
/// `api_error`; an empty string is a bare `api_rejection`.
pub fn classify(raw_message: &str) -> ClassifiedError {
    classify_with_details(raw_message, Vec::new())
}

/// Classify raw carrier error text, carrying structured detail strings
/// through to the result.
pub fn classify_with_details(raw_message: &str, details: Vec<String>) -> ClassifiedError {
    if raw_message.trim().is_empty() && details.is_empty() {
        return ClassifiedError::bare_rejection();
    }

    // Details participate in matching: some carriers put the useful text in
    // the structured list and leave the top-level message generic.
    let mut haystack = raw_message.to_lowercase();
    for detail in &details {
        haystack.push('\n');
        haystack.push_str(&detail.to_lowercase());
    }

    let category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::ApiError);

    let message = FRIENDLY_PHRASES
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, phrase)| (*phrase).to_string())
        .unwrap_or_else(|| FRIENDLY_FALLBACK.to_string());

    ClassifiedError {
        category,
        message,
        raw_message: raw_message.to_string(),
        details,
        can_retry: category.can_retry(),
        classified_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error() {
        let err = classify("Authentication failed: invalid client id");
        assert_eq!(err.category, ErrorCategory::AuthError);
        assert!(!err.can_retry);
        assert!(err.message.contains("credentials"));
        assert_eq!(err.raw_message, "Authentication failed: invalid client id");
    }

    #[test]
    fn test_address_validation() {
        let err = classify("The destination CITY could not be verified");
        assert_eq!(err.category, ErrorCategory::AddressValidation);
        assert!(!err.can_retry);
    }

    #[test]
    fn test_package_validation() {
        let err = classify("Declared weight exceeds the limit for this service level");
        assert_eq!(err.category, ErrorCategory::PackageValidation);
        assert!(!err.can_retry);
    }

    #[test]
    fn test_rate_limited() {
        let err = classify("Request throttled, slow down");
        assert_eq!(err.category, ErrorCategory::RateLimited);
        assert!(err.can_retry);
    }

    #[test]
    fn test_network_error() {
        let err = classify("connection reset by peer");
        assert_eq!(err.category, ErrorCategory::NetworkError);
        assert!(err.can_retry);
    }

    #[test]
    fn test_service_unavailable() {
        let err = classify("503: temporarily unavailable");
        assert_eq!(err.category, ErrorCategory::ServiceUnavailable);
        assert!(err.can_retry);
    }

    #[test]
    fn test_cascade_order_network_beats_unavailable() {
        // Matches both "connection" and "service"; the earlier category wins.
        let err = classify("connection to service lost");
        assert_eq!(err.category, ErrorCategory::NetworkError);
    }

    #[test]
    fn test_unmatched_falls_through_to_api_error() {
        let err = classify("E1234: unexpected flux in the warp core");
        assert_eq!(err.category, ErrorCategory::ApiError);
        assert!(!err.can_retry);
        assert_eq!(err.message, FRIENDLY_FALLBACK);
    }

    #[test]
    fn test_empty_message_is_bare_rejection() {
        let err = classify("");
        assert_eq!(err.category, ErrorCategory::ApiRejection);
        assert!(!err.can_retry);
    }

    #[test]
    fn test_details_participate_in_matching() {
        let err = classify_with_details(
            "Request invalid",
            vec!["postalCode: does not match city".to_string()],
        );
        assert_eq!(err.category, ErrorCategory::AddressValidation);
        assert_eq!(err.details.len(), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let err = classify("AUTHENTICATION ERROR");
        assert_eq!(err.category, ErrorCategory::AuthError);
    }

    #[test]
    fn test_system_error_constructor() {
        let err = ClassifiedError::system("database write failed");
        assert_eq!(err.category, ErrorCategory::SystemError);
        assert!(err.can_retry);
        assert_eq!(err.raw_message, "database write failed");
    }
}
