//! Application settings and configuration

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use shipping_common::carrier::CarriersConfig;
use shipping_common::measure::DEFAULT_MEASURE_PRECISION;
use shipping_common::shipment::Address;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Database configuration
    pub database: DatabaseSettings,
    /// Carrier gateway configuration
    #[serde(default)]
    pub carriers: CarriersConfig,
    /// Warehouse origin address
    pub warehouse: WarehouseSettings,
    /// Submission orchestrator knobs
    #[serde(default)]
    pub submission: SubmissionSettings,
    /// Notification settings
    #[serde(default)]
    pub notification: NotificationSettings,
}

impl Settings {
    /// Load settings from `config/default.toml`, an optional
    /// `config/local.toml` override, and `APP_*` environment variables
    /// (e.g. `APP_DATABASE__URL`).
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

/// Warehouse origin address; the sender side of every canonical request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseSettings {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl WarehouseSettings {
    /// The warehouse as a domain address.
    pub fn address(&self) -> Address {
        Address {
            name: self.name.clone(),
            company: self.company.clone(),
            line1: self.line1.clone(),
            line2: self.line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country_code: self.country_code.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// Submission orchestrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Wall-clock bound for one submission attempt, milliseconds
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    /// Days from "now" to the requested ship date
    #[serde(default = "default_ship_date_offset_days")]
    pub ship_date_offset_days: u32,
    /// Fractional digits for normalized measurements
    #[serde(default = "default_measure_precision")]
    pub measure_precision: u32,
}

fn default_attempt_timeout_ms() -> u64 {
    60_000
}

fn default_ship_date_offset_days() -> u32 {
    1
}

fn default_measure_precision() -> u32 {
    DEFAULT_MEASURE_PRECISION
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: default_attempt_timeout_ms(),
            ship_date_offset_days: default_ship_date_offset_days(),
            measure_precision: default_measure_precision(),
        }
    }
}

impl SubmissionSettings {
    /// Attempt timeout as a Duration.
    pub fn attempt_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.attempt_timeout_ms)
    }
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Whether to send label-ready notifications at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Webhook endpoint the notification service listens on
    #[serde(default)]
    pub webhook_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_notify_timeout_ms() -> u64 {
    5_000
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: String::new(),
            timeout_ms: default_notify_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
            [database]
            url = "postgres://localhost/dispatch"
            max_connections = 5

            [warehouse]
            name = "Fulfilment"
            company = "Acme Outfitters"
            line1 = "1 Depot Way"
            city = "Reno"
            state = "NV"
            postal_code = "89501"
            country_code = "US"

            [submission]
            attempt_timeout_ms = 30000

            [notification]
            webhook_url = "https://notify.internal/label-ready"

            [carriers.ups]
            account_number = "A1B2C3"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.database.url, "postgres://localhost/dispatch");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.database.min_connections, 2);
        assert_eq!(settings.warehouse.city, "Reno");
        assert_eq!(settings.submission.attempt_timeout_ms, 30_000);
        assert_eq!(settings.submission.measure_precision, 3);
        assert_eq!(settings.submission.ship_date_offset_days, 1);
        assert!(settings.notification.enabled);
        assert_eq!(
            settings.carriers.ups.account_number.as_deref(),
            Some("A1B2C3")
        );
        // Untouched carriers keep their defaults.
        assert_eq!(settings.carriers.dhl.auth.api_key_env, "DHL_API_KEY");
    }

    #[test]
    fn test_warehouse_address_mapping() {
        let warehouse = WarehouseSettings {
            name: "Fulfilment".to_string(),
            company: None,
            line1: "1 Depot Way".to_string(),
            line2: None,
            city: "Reno".to_string(),
            state: Some("NV".to_string()),
            postal_code: Some("89501".to_string()),
            country_code: "US".to_string(),
            phone: None,
            email: None,
        };
        let address = warehouse.address();
        assert_eq!(address.city, "Reno");
        assert_eq!(address.country_code, "US");
    }
}
