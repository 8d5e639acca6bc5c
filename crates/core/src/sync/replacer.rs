//! Delete-then-bulk-load replacement of a unit's items.
//!
//! The two steps are not atomic. A failure after the delete leaves the unit
//! without items until the next successful run.

use tracing::{info, warn};

use super::error::StoreError;
use super::ports::UnitStore;
use crate::item::ExpenseItem;
use crate::unit::ExecutionUnit;

/// Result of replacing a unit's items.
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// Both steps succeeded.
    Replaced {
        /// Rows removed by the delete step.
        deleted: u64,
        /// Rows written by the bulk load.
        inserted: u64,
    },
    /// The delete step failed; nothing was loaded.
    DeleteFailed(StoreError),
    /// The delete step succeeded but the bulk load failed.
    InsertFailed(StoreError),
}

/// Replaces a unit's stored items with a freshly fetched set.
pub struct StoreReplacer<'a> {
    store: &'a dyn UnitStore,
}

impl<'a> StoreReplacer<'a> {
    /// Creates a replacer over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn UnitStore) -> Self {
        Self { store }
    }

    /// Deletes the unit's previous items, then loads `items`.
    pub async fn replace(&self, unit: &ExecutionUnit, items: &[ExpenseItem]) -> ReplaceOutcome {
        let deleted = match self.store.delete_unit_items(unit).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(unit_id = %unit.unit_id, year = unit.year, error = %e, "Failed to delete previous items");
                return ReplaceOutcome::DeleteFailed(e);
            }
        };
        info!(unit_id = %unit.unit_id, year = unit.year, deleted, "Previous items deleted");

        match self.store.bulk_load_items(unit, items).await {
            Ok(inserted) => {
                info!(unit_id = %unit.unit_id, year = unit.year, inserted, "Items registered");
                ReplaceOutcome::Replaced { deleted, inserted }
            }
            Err(e) => {
                warn!(unit_id = %unit.unit_id, year = unit.year, error = %e, "Failed to bulk load items");
                ReplaceOutcome::InsertFailed(e)
            }
        }
    }
}
