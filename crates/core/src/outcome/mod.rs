//! Per-unit outcome aggregation.
//!
//! Only failures are recorded. A unit that completes every step leaves no
//! trace here, which is what the report relies on.

pub mod aggregator;
pub mod types;


pub use aggregator::OutcomeLog;
pub use types::{FailureReason, RunStatus, UnitOutcome};
