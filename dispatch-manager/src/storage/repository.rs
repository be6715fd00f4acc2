//! Postgres shipment repository.

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use shipping_common::error::{ErrorCategory, ErrorClassification};
use shipping_common::shipment::{
    Address, CarrierErrorRecord, CarrierService, CarrierServiceId, CarrierStatus, Customer,
    CustomerId, LabelArtifact, Package, PackageId, PackageItem, Shipment, ShipmentId,
    ShipmentStatus,
};

use crate::config::DatabaseSettings;

use super::{ShipmentStore, SubmissionRecord, SuccessRecord};

/// Repository errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),
}

impl ErrorClassification for StoreError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::SystemError
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Postgres-backed shipment store.
pub struct PgShipmentRepository {
    pool: PgPool,
}

impl PgShipmentRepository {
    /// Create a repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a repository from settings.
    pub async fn from_settings(settings: &DatabaseSettings) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&settings.url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Get the database pool reference.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_shipment(&self, id: ShipmentId) -> StoreResult<(Shipment, Uuid)> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, reference, status, carrier_status,
                   carrier_service_id, legacy_shipping_option, currency,
                   tracking_number, carrier_name, service_type, labels,
                   carrier_errors, delivery_address_id,
                   created_at, updated_at, submitted_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("shipment {id}")))?;

        let status_raw: String = row.try_get("status")?;
        let status = ShipmentStatus::parse(&status_raw)
            .ok_or_else(|| StoreError::InvalidData(format!("shipment status '{status_raw}'")))?;

        let carrier_status_raw: String = row.try_get("carrier_status")?;
        let carrier_status = CarrierStatus::parse(&carrier_status_raw).ok_or_else(|| {
            StoreError::InvalidData(format!("carrier status '{carrier_status_raw}'"))
        })?;

        let labels: Option<serde_json::Value> = row.try_get("labels")?;
        let labels: Vec<LabelArtifact> = labels
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| StoreError::InvalidData(format!("labels column: {e}")))?
            .unwrap_or_default();

        let carrier_errors: Option<serde_json::Value> = row.try_get("carrier_errors")?;
        let carrier_errors: Option<CarrierErrorRecord> = carrier_errors
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| StoreError::InvalidData(format!("carrier_errors column: {e}")))?;

        let delivery_address_id: Uuid = row.try_get("delivery_address_id")?;

        let shipment = Shipment {
            id: ShipmentId::from(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from(row.try_get::<Uuid, _>("customer_id")?),
            reference: row.try_get("reference")?,
            status,
            carrier_status,
            carrier_service_id: row
                .try_get::<Option<Uuid>, _>("carrier_service_id")?
                .map(CarrierServiceId::from),
            legacy_shipping_option: row.try_get("legacy_shipping_option")?,
            currency: row.try_get("currency")?,
            tracking_number: row.try_get("tracking_number")?,
            carrier_name: row.try_get("carrier_name")?,
            service_type: row.try_get("service_type")?,
            labels,
            carrier_errors,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            submitted_at: row.try_get("submitted_at")?,
        };

        Ok((shipment, delivery_address_id))
    }

    async fn load_packages(&self, shipment_id: ShipmentId) -> StoreResult<Vec<Package>> {
        let rows = sqlx::query(
            r#"
            SELECT id, shipment_id, weight_kg, length_cm, width_cm, height_cm
            FROM packages
            WHERE shipment_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(shipment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut packages = Vec::with_capacity(rows.len());
        for row in rows {
            let package_id = PackageId::from(row.try_get::<Uuid, _>("id")?);

            let item_rows = sqlx::query(
                r#"
                SELECT description, quantity, weight_kg, unit_value,
                       origin_country, hs_code
                FROM package_items
                WHERE package_id = $1
                ORDER BY position, id
                "#,
            )
            .bind(package_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

            let mut items = Vec::with_capacity(item_rows.len());
            for item in item_rows {
                let quantity: i32 = item.try_get("quantity")?;
                items.push(PackageItem {
                    description: item.try_get("description")?,
                    quantity: u32::try_from(quantity).map_err(|_| {
                        StoreError::InvalidData(format!("negative item quantity {quantity}"))
                    })?,
                    weight_kg: item.try_get("weight_kg")?,
                    unit_value: item.try_get::<Decimal, _>("unit_value")?,
                    origin_country: item.try_get("origin_country")?,
                    hs_code: item.try_get("hs_code")?,
                });
            }

            packages.push(Package {
                id: package_id,
                shipment_id: ShipmentId::from(row.try_get::<Uuid, _>("shipment_id")?),
                weight_kg: row.try_get("weight_kg")?,
                length_cm: row.try_get("length_cm")?,
                width_cm: row.try_get("width_cm")?,
                height_cm: row.try_get("height_cm")?,
                items,
            });
        }

        Ok(packages)
    }

    async fn load_address(&self, id: Uuid) -> StoreResult<Address> {
        let row = sqlx::query(
            r#"
            SELECT name, company, line1, line2, city, state, postal_code,
                   country_code, phone, email
            FROM addresses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("address {id}")))?;

        Ok(Address {
            name: row.try_get("name")?,
            company: row.try_get("company")?,
            line1: row.try_get("line1")?,
            line2: row.try_get("line2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country_code: row.try_get("country_code")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
        })
    }

    async fn load_customer(&self, id: CustomerId) -> StoreResult<Customer> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("customer {id}")))?;

        Ok(Customer {
            id: CustomerId::from(row.try_get::<Uuid, _>("id")?),
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
        })
    }

    async fn load_carrier_service(
        &self,
        id: CarrierServiceId,
    ) -> StoreResult<Option<CarrierService>> {
        let row = sqlx::query(
            r#"
            SELECT id, carrier_code, service_code, api_service_code, display_name
            FROM carrier_services
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(CarrierService {
                id: CarrierServiceId::from(row.try_get::<Uuid, _>("id")?),
                carrier_code: row.try_get("carrier_code")?,
                service_code: row.try_get("service_code")?,
                api_service_code: row.try_get("api_service_code")?,
                display_name: row.try_get("display_name")?,
            })
        })
        .transpose()
    }
}

#[async_trait::async_trait]
impl ShipmentStore for PgShipmentRepository {
    async fn load_for_submission(&self, id: ShipmentId) -> StoreResult<SubmissionRecord> {
        let (shipment, delivery_address_id) = self.load_shipment(id).await?;

        let packages = self.load_packages(id).await?;
        let recipient = self.load_address(delivery_address_id).await?;
        let customer = self.load_customer(shipment.customer_id).await?;

        let carrier_service = match shipment.carrier_service_id {
            Some(service_id) => self.load_carrier_service(service_id).await?,
            None => None,
        };

        debug!(shipment = %id, packages = packages.len(), "loaded shipment for submission");

        Ok(SubmissionRecord {
            shipment,
            packages,
            recipient,
            customer,
            carrier_service,
        })
    }

    async fn record_success(&self, id: ShipmentId, outcome: &SuccessRecord) -> StoreResult<()> {
        let labels = serde_json::to_value(&outcome.labels)
            .map_err(|e| StoreError::InvalidData(format!("labels encoding: {e}")))?;

        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET tracking_number = $2,
                carrier_name = $3,
                service_type = $4,
                labels = $5,
                carrier_status = 'submitted',
                status = 'label_ready',
                carrier_errors = NULL,
                submitted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'paid'
            "#,
        )
        .bind(id.as_uuid())
        .bind(&outcome.tracking_number)
        .bind(&outcome.carrier_name)
        .bind(&outcome.service_type)
        .bind(labels)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "shipment {id} was not in 'paid' status when recording success"
            )));
        }
        Ok(())
    }

    async fn record_failure(&self, id: ShipmentId, error: &CarrierErrorRecord) -> StoreResult<()> {
        let carrier_errors = serde_json::to_value(error)
            .map_err(|e| StoreError::InvalidData(format!("carrier_errors encoding: {e}")))?;

        // The tracking_number guard keeps "tracking number present" and
        // "carrier_status = failed" mutually exclusive.
        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET carrier_errors = $2,
                carrier_status = 'failed',
                updated_at = NOW()
            WHERE id = $1 AND status = 'paid' AND tracking_number IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(carrier_errors)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "shipment {id} was not in a failable state when recording failure"
            )));
        }
        Ok(())
    }

    async fn find_pending(&self, limit: i64) -> StoreResult<Vec<ShipmentId>> {
        let rows = sqlx::query(
            r#"
            SELECT id
            FROM shipments
            WHERE status = 'paid' AND tracking_number IS NULL
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok(ShipmentId::from(row.try_get::<Uuid, _>("id")?)))
            .collect()
    }
}
