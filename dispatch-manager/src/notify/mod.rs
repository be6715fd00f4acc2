//! Label-ready notification port.
//!
//! After a successful submission the orchestrator fires one notification so
//! the customer gets their tracking number. Delivery is best-effort by
//! design: a notification failure is logged and never reverts the shipment's
//! successful state. Transport mechanics (the actual email) live behind the
//! webhook on the other side.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use shipping_common::shipment::ShipmentId;

use crate::config::NotificationSettings;

/// Notification failures. Always non-fatal to the caller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(String),

    #[error("Notification endpoint returned HTTP {0}")]
    Endpoint(u16),

    #[error("Notification configuration error: {0}")]
    Configuration(String),
}

/// The payload handed to the notification collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct LabelReadyNotification {
    pub shipment_id: ShipmentId,
    pub reference: String,
    pub customer_email: String,
    pub customer_name: String,
    pub carrier_name: String,
    pub tracking_number: String,
}

/// Port for the tracking-ready notification side effect.
#[async_trait]
pub trait ShipmentNotifier: Send + Sync {
    /// Notify the customer that their label is ready.
    async fn label_ready(&self, notification: &LabelReadyNotification) -> Result<(), NotifyError>;
}

/// Posts notifications to the notification service's webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

impl WebhookNotifier {
    /// Build a notifier from settings.
    pub fn from_settings(settings: &NotificationSettings) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.webhook_url.clone(),
            enabled: settings.enabled && !settings.webhook_url.is_empty(),
        })
    }
}

#[async_trait]
impl ShipmentNotifier for WebhookNotifier {
    async fn label_ready(&self, notification: &LabelReadyNotification) -> Result<(), NotifyError> {
        if !self.enabled {
            debug!(shipment = %notification.shipment_id, "notifications disabled, skipping");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Endpoint(response.status().as_u16()));
        }

        info!(
            shipment = %notification.shipment_id,
            tracking_number = %notification.tracking_number,
            "label-ready notification sent"
        );
        Ok(())
    }
}

/// Notifier that does nothing. Used in tests and one-off tooling.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl ShipmentNotifier for NoopNotifier {
    async fn label_ready(&self, notification: &LabelReadyNotification) -> Result<(), NotifyError> {
        debug!(shipment = %notification.shipment_id, "noop notifier invoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_payload_shape() {
        let notification = LabelReadyNotification {
            shipment_id: ShipmentId::generate(),
            reference: "ORD-1".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_name: "Dana Smith".to_string(),
            carrier_name: "DHL Express".to_string(),
            tracking_number: "JD0001".to_string(),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["customer_email"], "dana@example.com");
        assert_eq!(json["tracking_number"], "JD0001");
    }

    #[tokio::test]
    async fn test_disabled_webhook_notifier_is_a_noop() {
        let notifier = WebhookNotifier::from_settings(&NotificationSettings {
            enabled: false,
            webhook_url: "https://example.invalid/hook".to_string(),
            timeout_ms: 1000,
        })
        .unwrap();

        let notification = LabelReadyNotification {
            shipment_id: ShipmentId::generate(),
            reference: "ORD-1".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_name: "Dana Smith".to_string(),
            carrier_name: "UPS".to_string(),
            tracking_number: "1Z999".to_string(),
        };
        assert!(notifier.label_ready(&notification).await.is_ok());
    }
}
