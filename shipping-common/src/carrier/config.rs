//! Carrier gateway configuration.
//!
//! These types deserialize from the service's TOML configuration. API
//! credentials never appear in files; configs name the environment variables
//! that hold them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// REST endpoint configuration shared by all gateways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL for the carrier API
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RestConfig {
    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Credential configuration. Values are loaded from the named environment
/// variables at gateway construction time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Environment variable holding the API key / client id
    #[serde(default)]
    pub api_key_env: String,
    /// Environment variable holding the API secret / client secret
    #[serde(default)]
    pub api_secret_env: String,
}

impl AuthConfig {
    /// Create an auth config with environment variable names.
    pub fn new(api_key_env: impl Into<String>, api_secret_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
            api_secret_env: api_secret_env.into(),
        }
    }

    /// Load the API key from the environment.
    pub fn load_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }

    /// Load the API secret from the environment.
    pub fn load_api_secret(&self) -> Option<String> {
        std::env::var(&self.api_secret_env).ok()
    }
}

/// Configuration for one carrier gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierConfig {
    /// Whether this carrier may be resolved at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Carrier account / billing number, where the API requires one
    #[serde(default)]
    pub account_number: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rest: RestConfig::default(),
            auth: AuthConfig::default(),
            account_number: None,
        }
    }
}

impl CarrierConfig {
    /// Config with a base URL and conventional env-var names derived from a
    /// prefix: `<PREFIX>_API_KEY` / `<PREFIX>_API_SECRET`.
    pub fn with_defaults(base_url: impl Into<String>, env_prefix: &str) -> Self {
        Self {
            enabled: true,
            rest: RestConfig {
                base_url: base_url.into(),
                ..RestConfig::default()
            },
            auth: AuthConfig::new(
                format!("{env_prefix}_API_KEY"),
                format!("{env_prefix}_API_SECRET"),
            ),
            account_number: None,
        }
    }
}

/// Configuration for every supported carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarriersConfig {
    #[serde(default = "default_dhl")]
    pub dhl: CarrierConfig,
    #[serde(default = "default_fedex")]
    pub fedex: CarrierConfig,
    #[serde(default = "default_ups")]
    pub ups: CarrierConfig,
    #[serde(default = "default_myus")]
    pub myus: CarrierConfig,
}

fn default_dhl() -> CarrierConfig {
    CarrierConfig::with_defaults("https://express.api.dhl.com/mydhlapi", "DHL")
}

fn default_fedex() -> CarrierConfig {
    CarrierConfig::with_defaults("https://apis.fedex.com", "FEDEX")
}

fn default_ups() -> CarrierConfig {
    CarrierConfig::with_defaults("https://onlinetools.ups.com", "UPS")
}

fn default_myus() -> CarrierConfig {
    CarrierConfig::with_defaults("https://api.myus.com", "MYUS")
}

impl Default for CarriersConfig {
    fn default() -> Self {
        Self {
            dhl: default_dhl(),
            fedex: default_fedex(),
            ups: default_ups(),
            myus: default_myus(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarriersConfig::default();
        assert!(config.dhl.enabled);
        assert_eq!(config.dhl.auth.api_key_env, "DHL_API_KEY");
        assert_eq!(config.fedex.auth.api_secret_env, "FEDEX_API_SECRET");
        assert!(config.ups.rest.base_url.contains("ups.com"));
        assert_eq!(config.myus.rest.timeout_ms, 15_000);
    }

    #[test]
    fn test_timeout_duration() {
        let rest = RestConfig {
            timeout_ms: 2_500,
            ..RestConfig::default()
        };
        assert_eq!(rest.timeout(), Duration::from_millis(2_500));
    }
}
