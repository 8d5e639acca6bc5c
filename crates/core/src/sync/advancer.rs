//! Status advancement of a fully replaced unit.

use tracing::{info, warn};

use super::error::StoreError;
use super::ports::UnitStore;
use crate::unit::ExecutionUnit;

/// Marks units processed once their items are replaced.
pub struct StatusAdvancer<'a> {
    store: &'a dyn UnitStore,
}

impl<'a> StatusAdvancer<'a> {
    /// Creates an advancer over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn UnitStore) -> Self {
        Self { store }
    }

    /// Flips the unit's processed flag.
    ///
    /// A failure here leaves the freshly loaded items in place; the unit is
    /// picked up again and reloaded by the next run.
    pub async fn advance(&self, unit: &ExecutionUnit) -> Result<(), StoreError> {
        match self.store.mark_unit_processed(unit).await {
            Ok(()) => {
                info!(unit_id = %unit.unit_id, year = unit.year, "Unit marked processed");
                Ok(())
            }
            Err(e) => {
                warn!(unit_id = %unit.unit_id, year = unit.year, error = %e, "Failed to mark unit processed");
                Err(e)
            }
        }
    }
}
