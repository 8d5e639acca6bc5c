//! Ports between the pipeline and the outside world.

use async_trait::async_trait;

use super::error::StoreError;
use crate::item::ExpenseItem;
use crate::unit::ExecutionUnit;

/// Result of fetching one unit's items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The service answered successfully. `items` may be empty.
    Fetched {
        /// Items returned by the successful attempt.
        items: Vec<ExpenseItem>,
        /// Attempts used, including the successful one.
        attempts: u32,
    },
    /// No attempt succeeded.
    Exhausted {
        /// Attempts made before giving up.
        attempts: u32,
        /// Error of the last attempt.
        last_error: String,
    },
}

impl FetchOutcome {
    /// Returns the number of calls made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Fetched { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Returns the fetched items; an exhausted fetch yields nothing.
    #[must_use]
    pub fn into_items(self) -> Vec<ExpenseItem> {
        match self {
            Self::Fetched { items, .. } => items,
            Self::Exhausted { .. } => Vec::new(),
        }
    }
}

/// Source of a unit's current expense items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Fetches the items of `unit`. Never fails: problems become [`FetchOutcome::Exhausted`].
    async fn fetch_items(&self, unit: &ExecutionUnit) -> FetchOutcome;
}

/// Backing store of execution units and their items.
///
/// Every call acquires and releases its own connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Lists units not yet processed for the configured year, in processing order.
    async fn list_pending_units(&self) -> Result<Vec<ExecutionUnit>, StoreError>;

    /// Deletes every stored item of `(unit_id, year)`. Returns the rows removed when known.
    async fn delete_unit_items(&self, unit: &ExecutionUnit) -> Result<u64, StoreError>;

    /// Bulk loads `items` for `unit`. Returns the rows written.
    async fn bulk_load_items(
        &self,
        unit: &ExecutionUnit,
        items: &[ExpenseItem],
    ) -> Result<u64, StoreError>;

    /// Marks `unit` processed.
    async fn mark_unit_processed(&self, unit: &ExecutionUnit) -> Result<(), StoreError>;
}
