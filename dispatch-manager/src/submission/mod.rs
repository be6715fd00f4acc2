//! The submission orchestrator.
//!
//! One asynchronous unit of work per triggering event, exactly one attempt,
//! bounded wall-clock time, terminal outcome always persisted.

mod service;

pub use service::{SubmissionError, SubmissionOutcome, SubmissionService};
