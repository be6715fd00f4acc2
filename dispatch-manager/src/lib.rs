//! # Dispatch Manager
//!
//! The carrier submission service: turns paid shipments into carrier labels
//! and durably records the outcome.
//!
//! ## Architecture
//!
//! A checkout event leaves a shipment persisted in `paid` status. One
//! submission attempt per trigger loads the shipment eagerly, resolves a
//! carrier gateway, builds the carrier-agnostic request, performs the
//! bounded carrier call, and persists exactly one terminal outcome: a label
//! (`label_ready` / `submitted`) or a classified, operator-recoverable
//! failure (`paid` / `failed`). There is no automatic retry: carrier
//! shipment creation is not idempotent, and a duplicate attempt means a
//! duplicate label and a duplicate charge. Resubmission is an explicit
//! operator action through the same entry point.

pub mod cli;
pub mod config;
pub mod notify;
pub mod storage;
pub mod submission;

pub use config::Settings;
pub use storage::{PgShipmentRepository, ShipmentStore, StoreError, SubmissionRecord};
pub use submission::{SubmissionError, SubmissionOutcome, SubmissionService};
