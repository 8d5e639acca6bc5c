//! Sync error types.

use std::time::Duration;

use thiserror::Error;

/// Errors reported by a [`UnitStore`](super::UnitStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed the operation.
    #[error("Database error: {0}")]
    Database(String),

    /// The operation did not finish within its time budget.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Items could not be encoded for the bulk load.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pending-unit listing failed; no unit was processed.
    #[error("Failed to list pending execution units: {0}")]
    PendingUnits(#[source] StoreError),
}
