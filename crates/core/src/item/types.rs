//! Expense item data types.
//!
//! Field names on the wire follow the remote service (`AnoEje`, `IdSector`,
//! `PIM`, ...). Every value arrives as text; the year and month are parsed as
//! integers and the amounts as decimals. An amount that is not a decimal is
//! dropped to `None` with a warning so one malformed cell does not sink the
//! whole response.

use rust_decimal::Decimal;
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing::warn;

/// One budget-execution record of a unit for a year and month.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseItem {
    /// Execution year.
    #[serde(rename = "AnoEje")]
    #[serde_as(as = "DisplayFromStr")]
    pub year: i32,
    /// Execution month.
    #[serde(rename = "MesEje")]
    #[serde_as(as = "DisplayFromStr")]
    pub month: i32,
    /// Government level.
    #[serde(rename = "IdNivelGobierno")]
    pub government_level: String,
    /// Government sub type.
    #[serde(rename = "Sub_tipo_gobierno")]
    pub government_subtype: String,
    /// Sector code.
    #[serde(rename = "IdSector")]
    pub sector_id: String,
    /// Pliego code.
    #[serde(rename = "IdPliego")]
    pub pliego_id: String,
    /// Executing entity code.
    #[serde(rename = "IdEjecutora")]
    pub executor_id: String,
    /// Execution unit sequence (`sec_ejec`).
    #[serde(rename = "SecEjec")]
    pub unit_id: String,
    /// Function.
    #[serde(rename = "Funcion")]
    pub function: String,
    /// Program.
    #[serde(rename = "Programa")]
    pub program: String,
    /// Budget program.
    #[serde(rename = "Programa_ppto")]
    pub budget_program: String,
    /// Expense category.
    #[serde(rename = "Categ_gasto")]
    pub expense_category: String,
    /// Transaction type.
    #[serde(rename = "Tipo_transaccion")]
    pub transaction_type: String,
    /// Generic classifier.
    #[serde(rename = "Generica")]
    pub generic: String,
    /// Sub-generic classifier.
    #[serde(rename = "Subgenerica")]
    pub subgeneric: String,
    /// Sub-generic detail classifier.
    #[serde(rename = "Subgenerica_det")]
    pub subgeneric_detail: String,
    /// Specific classifier.
    #[serde(rename = "Especifica")]
    pub specific: String,
    /// Specific detail classifier.
    #[serde(rename = "Especifica_det")]
    pub specific_detail: String,
    /// Functional sequence.
    #[serde(rename = "SecFunc")]
    pub functional_sequence: String,
    /// Funding source.
    #[serde(rename = "IdFuente")]
    pub funding_source_id: String,
    /// Rubric.
    #[serde(rename = "IdRubro")]
    pub rubric_id: String,
    /// Resource type.
    #[serde(rename = "IdTipoRecurso")]
    pub resource_type_id: String,
    /// Component.
    #[serde(rename = "IdComponente")]
    pub component_id: String,
    /// Project.
    #[serde(rename = "IdProyecto")]
    pub project_id: String,
    /// Activity or project type.
    #[serde(rename = "TipoActProy")]
    pub activity_project_type: String,
    /// Goal.
    #[serde(rename = "IdMeta")]
    pub goal_id: String,
    /// Purpose.
    #[serde(rename = "IdFinalidad")]
    pub purpose_id: String,
    /// SNIP investment project code.
    #[serde(rename = "IdProyectoSNIP")]
    pub snip_project_id: String,
    /// Department (geographic).
    #[serde(rename = "Departamento")]
    pub department: String,
    /// Province (geographic).
    #[serde(rename = "Provincia")]
    pub province: String,
    /// District (geographic).
    #[serde(rename = "Distrito")]
    pub district: String,
    /// Unit of measure.
    #[serde(rename = "Unidad_Medida")]
    pub unit_of_measure: String,
    /// Opening budget (PIA).
    #[serde(rename = "PIA", deserialize_with = "blank_as_none")]
    pub pia: Option<Decimal>,
    /// Modified budget (PIM).
    #[serde(rename = "PIM", deserialize_with = "blank_as_none")]
    pub pim: Option<Decimal>,
    /// Certified amount.
    #[serde(rename = "Certificado", deserialize_with = "blank_as_none")]
    pub certified: Option<Decimal>,
    /// Annual commitment.
    #[serde(rename = "CompAnual", deserialize_with = "blank_as_none")]
    pub annual_commitment: Option<Decimal>,
    /// Monthly commitment attention.
    #[serde(rename = "AtencionCompMensual", deserialize_with = "blank_as_none")]
    pub monthly_commitment: Option<Decimal>,
    /// Accrued amount (devengado).
    #[serde(rename = "Devengado", deserialize_with = "blank_as_none")]
    pub accrued: Option<Decimal>,
    /// Paid amount (girado).
    #[serde(rename = "Girado", deserialize_with = "blank_as_none")]
    pub paid: Option<Decimal>,
    /// Multi-executor flag.
    #[serde(rename = "Multiejecutora")]
    pub multi_executor: String,
}

impl ExpenseItem {
    /// Builds an item from `(element name, text)` pairs.
    ///
    /// Missing elements take their default value; unknown elements are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the year or month cannot be parsed or a field repeats.
    pub fn from_fields<I>(fields: I) -> Result<Self, ValueError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()))
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<Decimal>() {
        Ok(amount) => Ok(Some(amount)),
        Err(e) => {
            warn!(value = raw, error = %e, "Unparseable amount stored as NULL");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn field(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_from_fields_maps_wire_names() {
        let item = ExpenseItem::from_fields([
            field("AnoEje", "2026"),
            field("MesEje", "4"),
            field("SecEjec", "001234"),
            field("IdSector", "10"),
            field("Unidad_Medida", "PROYECTO"),
            field("PIM", "1500000.50"),
            field("Devengado", "250000"),
            field("Multiejecutora", "N"),
        ])
        .expect("valid item");

        assert_eq!(item.year, 2026);
        assert_eq!(item.month, 4);
        assert_eq!(item.unit_id, "001234");
        assert_eq!(item.sector_id, "10");
        assert_eq!(item.unit_of_measure, "PROYECTO");
        assert_eq!(item.pim, Some(dec!(1500000.50)));
        assert_eq!(item.accrued, Some(dec!(250000)));
        assert_eq!(item.multi_executor, "N");
    }

    #[test]
    fn test_missing_and_blank_amounts_are_none() {
        let item = ExpenseItem::from_fields([
            field("AnoEje", "2026"),
            field("MesEje", "1"),
            field("PIA", "  "),
        ])
        .expect("valid item");

        assert_eq!(item.pia, None);
        assert_eq!(item.paid, None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let item = ExpenseItem::from_fields([
            field("AnoEje", "2026"),
            field("MesEje", "1"),
            field("FechaInsercion", "2026-01-01T00:00:00"),
        ]);

        assert!(item.is_ok());
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        let result =
            ExpenseItem::from_fields([field("AnoEje", "two thousand"), field("MesEje", "1")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unparseable_amount_becomes_none() {
        let item = ExpenseItem::from_fields([
            field("AnoEje", "2026"),
            field("MesEje", "1"),
            field("PIM", "1,500.50"),
            field("Girado", "-"),
            field("Devengado", "12.5"),
        ])
        .expect("item survives a malformed amount");

        assert_eq!(item.pim, None);
        assert_eq!(item.paid, None);
        assert_eq!(item.accrued, Some(dec!(12.5)));
    }
}
