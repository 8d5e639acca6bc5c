//! Initial database migration.
//!
//! Creates the execution unit and expense item tables together with the
//! routines the sync job calls: the pending-unit listing, the per-unit item
//! delete and the status update.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TABLES
        // ============================================================
        db.execute_unprepared(EXECUTION_UNITS_SQL).await?;
        db.execute_unprepared(EXPENSE_ITEMS_SQL).await?;

        // ============================================================
        // PART 2: ROUTINES
        // ============================================================
        db.execute_unprepared(LIST_PENDING_SQL).await?;
        db.execute_unprepared(DELETE_ITEMS_SQL).await?;
        db.execute_unprepared(MARK_PROCESSED_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const EXECUTION_UNITS_SQL: &str = r"
CREATE TABLE execution_units (
    unit_id VARCHAR(20) NOT NULL,
    year INTEGER NOT NULL,
    service_descriptor TEXT NOT NULL,
    processed BOOLEAN NOT NULL DEFAULT FALSE,
    processed_at TIMESTAMPTZ,
    PRIMARY KEY (unit_id, year)
);

CREATE INDEX idx_execution_units_pending ON execution_units(year, unit_id) WHERE NOT processed;
";

const EXPENSE_ITEMS_SQL: &str = r"
CREATE TABLE expense_items (
    id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    government_level TEXT NOT NULL DEFAULT '',
    government_subtype TEXT NOT NULL DEFAULT '',
    sector_id TEXT NOT NULL DEFAULT '',
    pliego_id TEXT NOT NULL DEFAULT '',
    executor_id TEXT NOT NULL DEFAULT '',
    unit_id VARCHAR(20) NOT NULL,
    function TEXT NOT NULL DEFAULT '',
    program TEXT NOT NULL DEFAULT '',
    budget_program TEXT NOT NULL DEFAULT '',
    expense_category TEXT NOT NULL DEFAULT '',
    transaction_type TEXT NOT NULL DEFAULT '',
    generic TEXT NOT NULL DEFAULT '',
    subgeneric TEXT NOT NULL DEFAULT '',
    subgeneric_detail TEXT NOT NULL DEFAULT '',
    specific TEXT NOT NULL DEFAULT '',
    specific_detail TEXT NOT NULL DEFAULT '',
    functional_sequence TEXT NOT NULL DEFAULT '',
    funding_source_id TEXT NOT NULL DEFAULT '',
    rubric_id TEXT NOT NULL DEFAULT '',
    resource_type_id TEXT NOT NULL DEFAULT '',
    component_id TEXT NOT NULL DEFAULT '',
    project_id TEXT NOT NULL DEFAULT '',
    activity_project_type TEXT NOT NULL DEFAULT '',
    goal_id TEXT NOT NULL DEFAULT '',
    purpose_id TEXT NOT NULL DEFAULT '',
    snip_project_id TEXT NOT NULL DEFAULT '',
    department TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    district TEXT NOT NULL DEFAULT '',
    unit_of_measure TEXT NOT NULL DEFAULT '',
    pia NUMERIC,
    pim NUMERIC,
    certified NUMERIC,
    annual_commitment NUMERIC,
    monthly_commitment NUMERIC,
    accrued NUMERIC,
    paid NUMERIC,
    multi_executor TEXT NOT NULL DEFAULT '',
    inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_expense_items_unit ON expense_items(unit_id, year);
";

const LIST_PENDING_SQL: &str = r"
CREATE FUNCTION list_pending_execution_units()
RETURNS TABLE (unit_id VARCHAR(20), year INTEGER, service_descriptor TEXT)
LANGUAGE sql STABLE AS $$
    SELECT u.unit_id, u.year, u.service_descriptor
    FROM execution_units u
    WHERE NOT u.processed
    ORDER BY u.year, u.unit_id
$$;
";

const DELETE_ITEMS_SQL: &str = r"
CREATE PROCEDURE delete_unit_expense_items(p_unit_id TEXT, p_year INTEGER)
LANGUAGE sql AS $$
    DELETE FROM expense_items WHERE unit_id = p_unit_id AND year = p_year;
$$;
";

const MARK_PROCESSED_SQL: &str = r"
CREATE PROCEDURE mark_execution_unit_processed(p_unit_id TEXT, p_year INTEGER)
LANGUAGE sql AS $$
    UPDATE execution_units
    SET processed = TRUE, processed_at = NOW()
    WHERE unit_id = p_unit_id AND year = p_year;
$$;
";

const DROP_ALL_SQL: &str = r"
DROP PROCEDURE IF EXISTS mark_execution_unit_processed(TEXT, INTEGER);
DROP PROCEDURE IF EXISTS delete_unit_expense_items(TEXT, INTEGER);
DROP FUNCTION IF EXISTS list_pending_execution_units();
DROP TABLE IF EXISTS expense_items;
DROP TABLE IF EXISTS execution_units;
";
