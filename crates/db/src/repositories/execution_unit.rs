//! Execution unit repository.
//!
//! Every call borrows its own pooled connection and gives it back on every
//! exit path. Each call is bounded by the command timeout; each `COPY` batch
//! by the batch timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use itemsync_core::{ExecutionUnit, ExpenseItem, StoreError, UnitStore};
use itemsync_shared::BulkLoadConfig;
use sqlx::postgres::PgPoolCopyExt;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, FromQueryResult, Statement,
};
use tracing::{debug, warn};

use crate::bulk;

const LIST_PENDING_SQL: &str =
    "SELECT unit_id, year, service_descriptor FROM list_pending_execution_units()";
const DELETE_ITEMS_SQL: &str = "CALL delete_unit_expense_items($1, $2)";
const MARK_PROCESSED_SQL: &str = "CALL mark_execution_unit_processed($1, $2)";

#[derive(Debug, FromQueryResult)]
struct PendingUnitRow {
    unit_id: String,
    year: i32,
    service_descriptor: String,
}

impl From<PendingUnitRow> for ExecutionUnit {
    fn from(row: PendingUnitRow) -> Self {
        Self::new(row.unit_id, row.year, row.service_descriptor)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn db_err(e: DbErr) -> StoreError {
    StoreError::Database(e.to_string())
}

#[allow(clippy::needless_pass_by_value)]
fn sqlx_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Runs `op`, failing with [`StoreError::Timeout`] once `limit` elapses.
async fn bounded<T, F>(limit: Duration, op: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, op)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// PostgreSQL backed [`UnitStore`].
#[derive(Debug, Clone)]
pub struct ExecutionUnitRepository {
    db: DatabaseConnection,
    command_timeout: Duration,
    bulk: BulkLoadConfig,
}

impl ExecutionUnitRepository {
    /// Creates a new execution unit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, command_timeout: Duration, bulk: BulkLoadConfig) -> Self {
        Self {
            db,
            command_timeout,
            bulk,
        }
    }

    fn unit_statement(sql: &str, unit: &ExecutionUnit) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [unit.unit_id.clone().into(), unit.year.into()],
        )
    }

    /// Sends one batch through `COPY` and returns the rows written.
    async fn copy_batch(&self, statement: &str, payload: Vec<u8>) -> Result<u64, StoreError> {
        let pool = self.db.get_postgres_connection_pool();
        let mut copy = pool.copy_in_raw(statement).await.map_err(sqlx_err)?;
        copy.send(payload).await.map_err(sqlx_err)?;
        copy.finish().await.map_err(sqlx_err)
    }
}

#[async_trait]
impl UnitStore for ExecutionUnitRepository {
    async fn list_pending_units(&self) -> Result<Vec<ExecutionUnit>, StoreError> {
        let rows = bounded(self.command_timeout, async {
            PendingUnitRow::find_by_statement(Statement::from_string(
                DatabaseBackend::Postgres,
                LIST_PENDING_SQL,
            ))
            .all(&self.db)
            .await
            .map_err(db_err)
        })
        .await?;

        debug!(units = rows.len(), "Pending execution units listed");
        Ok(rows.into_iter().map(ExecutionUnit::from).collect())
    }

    async fn delete_unit_items(&self, unit: &ExecutionUnit) -> Result<u64, StoreError> {
        let result = bounded(self.command_timeout, async {
            self.db
                .execute(Self::unit_statement(DELETE_ITEMS_SQL, unit))
                .await
                .map_err(db_err)
        })
        .await?;

        debug!(unit_id = %unit.unit_id, year = unit.year, "Stored items deleted");
        Ok(result.rows_affected())
    }

    async fn bulk_load_items(
        &self,
        unit: &ExecutionUnit,
        items: &[ExpenseItem],
    ) -> Result<u64, StoreError> {
        let statement = bulk::copy_statement();
        let inserted_at = bulk::load_timestamp(Utc::now());
        let batch_timeout = self.bulk.batch_timeout();
        let mut written = 0;

        let foreign = bulk::foreign_items(unit, items);
        if foreign > 0 {
            warn!(
                unit_id = %unit.unit_id,
                year = unit.year,
                foreign,
                "Items carry another unit or year, storing them under the loaded unit"
            );
        }

        for (batch, chunk) in items.chunks(self.bulk.batch_size.max(1)).enumerate() {
            let payload = bulk::encode_batch(unit, chunk, &inserted_at)
                .map_err(|e| StoreError::Encoding(e.to_string()))?;
            let rows = bounded(batch_timeout, self.copy_batch(&statement, payload)).await?;
            debug!(unit_id = %unit.unit_id, batch, rows, "Batch copied");
            written += rows;
        }

        debug!(unit_id = %unit.unit_id, year = unit.year, rows = written, "Items bulk loaded");
        Ok(written)
    }

    async fn mark_unit_processed(&self, unit: &ExecutionUnit) -> Result<(), StoreError> {
        bounded(self.command_timeout, async {
            self.db
                .execute(Self::unit_statement(MARK_PROCESSED_SQL, unit))
                .await
                .map_err(db_err)
        })
        .await?;

        debug!(unit_id = %unit.unit_id, year = unit.year, "Unit marked processed");
        Ok(())
    }
}
