//! `COPY` encoding of expense items.
//!
//! Rows are written as headerless CSV in [`COLUMNS`] order. The `unit_id` and
//! `year` columns come from the execution unit being loaded, never from the
//! item, so a load always lands under the key its delete cleared. Text columns are
//! listed under `FORCE_NOT_NULL` so an empty string stays an empty string;
//! an empty amount becomes `NULL`.

use chrono::{DateTime, SecondsFormat, Utc};
use itemsync_core::{ExecutionUnit, ExpenseItem};
use rust_decimal::Decimal;
use serde::Serialize;

/// Target table of the bulk load.
pub const TABLE: &str = "expense_items";

/// Loaded columns, in CSV field order.
pub const COLUMNS: [&str; 41] = [
    "year",
    "month",
    "government_level",
    "government_subtype",
    "sector_id",
    "pliego_id",
    "executor_id",
    "unit_id",
    "function",
    "program",
    "budget_program",
    "expense_category",
    "transaction_type",
    "generic",
    "subgeneric",
    "subgeneric_detail",
    "specific",
    "specific_detail",
    "functional_sequence",
    "funding_source_id",
    "rubric_id",
    "resource_type_id",
    "component_id",
    "project_id",
    "activity_project_type",
    "goal_id",
    "purpose_id",
    "snip_project_id",
    "department",
    "province",
    "district",
    "unit_of_measure",
    "pia",
    "pim",
    "certified",
    "annual_commitment",
    "monthly_commitment",
    "accrued",
    "paid",
    "multi_executor",
    "inserted_at",
];

/// Non-text columns; an empty field in them loads as `NULL`.
const NON_TEXT_COLUMNS: [&str; 10] = [
    "year",
    "month",
    "pia",
    "pim",
    "certified",
    "annual_commitment",
    "monthly_commitment",
    "accrued",
    "paid",
    "inserted_at",
];

/// Builds the `COPY ... FROM STDIN` statement for [`COLUMNS`].
#[must_use]
pub fn copy_statement() -> String {
    let text_columns: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|c| !NON_TEXT_COLUMNS.contains(c))
        .collect();
    format!(
        "COPY {TABLE} ({}) FROM STDIN WITH (FORMAT csv, FORCE_NOT_NULL ({}))",
        COLUMNS.join(", "),
        text_columns.join(", ")
    )
}

/// One CSV row. Field order must match [`COLUMNS`].
#[derive(Serialize)]
struct CopyRow<'a> {
    year: i32,
    month: i32,
    government_level: &'a str,
    government_subtype: &'a str,
    sector_id: &'a str,
    pliego_id: &'a str,
    executor_id: &'a str,
    unit_id: &'a str,
    function: &'a str,
    program: &'a str,
    budget_program: &'a str,
    expense_category: &'a str,
    transaction_type: &'a str,
    generic: &'a str,
    subgeneric: &'a str,
    subgeneric_detail: &'a str,
    specific: &'a str,
    specific_detail: &'a str,
    functional_sequence: &'a str,
    funding_source_id: &'a str,
    rubric_id: &'a str,
    resource_type_id: &'a str,
    component_id: &'a str,
    project_id: &'a str,
    activity_project_type: &'a str,
    goal_id: &'a str,
    purpose_id: &'a str,
    snip_project_id: &'a str,
    department: &'a str,
    province: &'a str,
    district: &'a str,
    unit_of_measure: &'a str,
    pia: Option<Decimal>,
    pim: Option<Decimal>,
    certified: Option<Decimal>,
    annual_commitment: Option<Decimal>,
    monthly_commitment: Option<Decimal>,
    accrued: Option<Decimal>,
    paid: Option<Decimal>,
    multi_executor: &'a str,
    inserted_at: &'a str,
}

impl<'a> CopyRow<'a> {
    fn new(unit: &'a ExecutionUnit, item: &'a ExpenseItem, inserted_at: &'a str) -> Self {
        Self {
            year: unit.year,
            month: item.month,
            government_level: &item.government_level,
            government_subtype: &item.government_subtype,
            sector_id: &item.sector_id,
            pliego_id: &item.pliego_id,
            executor_id: &item.executor_id,
            unit_id: &unit.unit_id,
            function: &item.function,
            program: &item.program,
            budget_program: &item.budget_program,
            expense_category: &item.expense_category,
            transaction_type: &item.transaction_type,
            generic: &item.generic,
            subgeneric: &item.subgeneric,
            subgeneric_detail: &item.subgeneric_detail,
            specific: &item.specific,
            specific_detail: &item.specific_detail,
            functional_sequence: &item.functional_sequence,
            funding_source_id: &item.funding_source_id,
            rubric_id: &item.rubric_id,
            resource_type_id: &item.resource_type_id,
            component_id: &item.component_id,
            project_id: &item.project_id,
            activity_project_type: &item.activity_project_type,
            goal_id: &item.goal_id,
            purpose_id: &item.purpose_id,
            snip_project_id: &item.snip_project_id,
            department: &item.department,
            province: &item.province,
            district: &item.district,
            unit_of_measure: &item.unit_of_measure,
            pia: item.pia,
            pim: item.pim,
            certified: item.certified,
            annual_commitment: item.annual_commitment,
            monthly_commitment: item.monthly_commitment,
            accrued: item.accrued,
            paid: item.paid,
            multi_executor: &item.multi_executor,
            inserted_at,
        }
    }
}

/// Formats the load timestamp shared by every row of one load.
#[must_use]
pub fn load_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Counts items whose own `SecEjec`/`AnoEje` disagree with `unit`.
#[must_use]
pub fn foreign_items(unit: &ExecutionUnit, items: &[ExpenseItem]) -> usize {
    items
        .iter()
        .filter(|item| item.unit_id != unit.unit_id || item.year != unit.year)
        .count()
}

/// Encodes one batch of `unit`'s items as headerless CSV.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized.
pub fn encode_batch(
    unit: &ExecutionUnit,
    items: &[ExpenseItem],
    inserted_at: &str,
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for item in items {
        writer.serialize(CopyRow::new(unit, item, inserted_at))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
