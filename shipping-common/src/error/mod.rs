//! Error taxonomy and classification for carrier submission failures.
//!
//! Every failure that reaches an operator is reduced to a fixed
//! [`ErrorCategory`] with a fixed retry-eligibility flag, plus a friendly
//! message distinct from the raw provider text. The [`classify`] cascade
//! turns arbitrary carrier error text into that shape.

mod category;
mod classify;

pub use category::{ErrorCategory, ErrorClassification};
pub use classify::{classify, classify_with_details, ClassifiedError};
