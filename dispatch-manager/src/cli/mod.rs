//! Operator CLI.
//!
//! Carrier submission is normally triggered by checkout events; these
//! commands are the external tooling around that pipeline: resubmitting a
//! failed shipment, listing stuck ones, and looking up tracking.

pub mod pending;
pub mod submit;
pub mod track;

use clap::{Parser, Subcommand};

/// Dispatch manager CLI
#[derive(Parser, Debug)]
#[command(name = "dispatch-manager", version, about = "Carrier submission service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one submission attempt for a paid shipment
    Submit(submit::SubmitArgs),
    /// List paid shipments awaiting carrier submission
    Pending(pending::PendingArgs),
    /// Look up carrier tracking for a tracking number
    Track(track::TrackArgs),
}
