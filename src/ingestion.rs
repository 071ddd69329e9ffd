//! CSV boundary for the two tabular sources: the historical month/income/
//! deduction dataset and the entity current-period dataset.
//!
//! Header names are resolved case-insensitively against small alias sets,
//! since the exports this tool receives are hand-maintained spreadsheets with
//! inconsistent capitalization. Rows are coerced into typed records here;
//! nothing downstream reads columns by string key.

use std::path::Path;

use log::warn;

use crate::error::{ProjectionError, Result};
use crate::schema::{EntitySnapshot, HistoricalRecord};
use crate::utils::clean_currency;

const MONTH_ALIASES: &[&str] = &["mes"];
const INCOME_ALIASES: &[&str] = &["ingreso", "ingresos"];
const DEDUCTION_ALIASES: &[&str] = &["deducciones", "deduccion", "ded"];

const NAME_ALIASES: &[&str] = &["nombre"];
const COEFFICIENT_ALIASES: &[&str] = &["coeficiente objetivo", "co"];
const CURRENT_INCOME_ALIASES: &[&str] = &["ingresoactual", "ia"];
const CURRENT_UTILITY_ALIASES: &[&str] = &["utilidadactual", "ua"];
const CURRENT_DEDUCTIONS_ALIASES: &[&str] = &["deduccionesactuales", "da"];

fn resolve_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_lowercase();
        aliases.iter().any(|alias| *alias == normalized)
    })
}

/// Resolves every logical column or fails naming the whole missing set at
/// once, alongside the headers actually present. Returns indices in the
/// order the columns were requested.
fn require_columns(
    headers: &csv::StringRecord,
    logical: &[(&str, &[&str])],
) -> Result<Vec<usize>> {
    let mut resolved = Vec::with_capacity(logical.len());
    let mut missing = Vec::new();

    for (name, aliases) in logical {
        match resolve_column(headers, aliases) {
            Some(idx) => resolved.push(idx),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ProjectionError::MissingRequiredColumns {
            missing,
            found: headers.iter().map(String::from).collect(),
        });
    }

    Ok(resolved)
}

/// Parses a month cell. Accepts integer-valued numerics ("3", "3.0"); anything
/// else is `None`. Range validation happens downstream so that an out-of-range
/// month is handled by whichever layer owns that record's tolerance policy.
fn parse_month(cell: &str) -> Option<u32> {
    let value = cell.trim().parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

fn parse_metric(cell: Option<&str>) -> f64 {
    cell.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Reads the historical dataset. Rows whose month cell fails coercion are
/// dropped with a warning; a metric cell that fails coercion contributes 0.0,
/// matching the tolerant aggregation the weight loader expects.
pub fn read_history_csv(path: impl AsRef<Path>) -> Result<Vec<HistoricalRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProjectionError::SourceNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let cols = require_columns(
        &headers,
        &[
            ("mes", MONTH_ALIASES),
            ("ingreso", INCOME_ALIASES),
            ("deducciones", DEDUCTION_ALIASES),
        ],
    )?;
    let (month_col, income_col, deduction_col) = (cols[0], cols[1], cols[2]);

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;

        let month = match row.get(month_col).and_then(parse_month) {
            Some(month) => month,
            None => {
                warn!(
                    "Dropping historical row {}: month cell {:?} is not a whole number",
                    row_idx + 1,
                    row.get(month_col).unwrap_or("")
                );
                continue;
            }
        };

        records.push(HistoricalRecord {
            month,
            income: parse_metric(row.get(income_col)),
            deduction: parse_metric(row.get(deduction_col)),
        });
    }

    Ok(records)
}

/// Reads the entity current-period dataset into snapshots.
///
/// Currency cells go through `clean_currency`. A month cell that fails
/// coercion is carried as 0 so the batch records that entity's invalid-month
/// failure instead of silently shrinking the portfolio.
pub fn read_entities_csv(path: impl AsRef<Path>) -> Result<Vec<EntitySnapshot>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProjectionError::SourceNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let cols = require_columns(
        &headers,
        &[
            ("nombre", NAME_ALIASES),
            ("coeficiente objetivo", COEFFICIENT_ALIASES),
            ("ingresoactual", CURRENT_INCOME_ALIASES),
            ("utilidadactual", CURRENT_UTILITY_ALIASES),
            ("deduccionesactuales", CURRENT_DEDUCTIONS_ALIASES),
            ("mes", MONTH_ALIASES),
        ],
    )?;
    let (name_col, coefficient_col, income_col, utility_col, deductions_col, month_col) =
        (cols[0], cols[1], cols[2], cols[3], cols[4], cols[5]);

    let mut snapshots = Vec::new();
    for row in reader.records() {
        let row = row?;

        let name = row.get(name_col).unwrap_or("").trim().to_string();
        let month = match row.get(month_col).and_then(parse_month) {
            Some(month) => month,
            None => {
                warn!(
                    "Entity '{}' has a non-numeric month cell {:?}; carrying 0 so the batch flags it",
                    name,
                    row.get(month_col).unwrap_or("")
                );
                0
            }
        };

        snapshots.push(EntitySnapshot {
            name,
            current_income: clean_currency(row.get(income_col).unwrap_or("")),
            current_utility: clean_currency(row.get(utility_col).unwrap_or("")),
            current_deductions: clean_currency(row.get(deductions_col).unwrap_or("")),
            coefficient_objective: clean_currency(row.get(coefficient_col).unwrap_or("")),
            current_month: month,
        });
    }

    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fiscal_projector_{}", name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_history_missing_file() {
        let result = read_history_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(ProjectionError::SourceNotFound(_))));
    }

    #[test]
    fn test_history_header_aliases_are_case_insensitive() {
        let path = write_fixture(
            "hist_aliases.csv",
            "A\u{f1}o,MES,Ingresos,Ded\n2023,1,100,40\n2023,2,300,60\n",
        );

        let records = read_history_csv(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, 1);
        assert_eq!(records[0].income, 100.0);
        assert_eq!(records[0].deduction, 40.0);
    }

    #[test]
    fn test_history_missing_columns_lists_both_sides() {
        let path = write_fixture("hist_missing.csv", "mes,otra\n1,2\n");

        match read_history_csv(&path) {
            Err(ProjectionError::MissingRequiredColumns { missing, found }) => {
                assert_eq!(missing, vec!["ingreso", "deducciones"]);
                assert!(found.contains(&"otra".to_string()));
            }
            other => panic!("expected MissingRequiredColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_history_drops_bad_month_rows_and_zeroes_bad_metrics() {
        let path = write_fixture(
            "hist_dirty.csv",
            "mes,ingreso,deducciones\nx,100,40\n2,abc,60\n3.0,300,\n",
        );

        let records = read_history_csv(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, 2);
        assert_eq!(records[0].income, 0.0);
        assert_eq!(records[0].deduction, 60.0);
        assert_eq!(records[1].month, 3);
        assert_eq!(records[1].income, 300.0);
        assert_eq!(records[1].deduction, 0.0);
    }

    #[test]
    fn test_entities_csv_with_original_headers() {
        let path = write_fixture(
            "entities_full.csv",
            "NOMBRE,RFC,Coeficiente objetivo,IngresoActual,UtilidadActual,DeduccionesActuales,Mes\n\
             ACME Corp,ACM010101,0.3,\"$100,000.00\",\"$20,000.00\",\"$6,000.00\",6\n",
        );

        let snapshots = read_entities_csv(&path).unwrap();
        assert_eq!(snapshots.len(), 1);

        let snapshot = &snapshots[0];
        assert_eq!(snapshot.name, "ACME Corp");
        assert_eq!(snapshot.current_income, 100_000.0);
        assert_eq!(snapshot.current_utility, 20_000.0);
        assert_eq!(snapshot.current_deductions, 6_000.0);
        assert_eq!(snapshot.coefficient_objective, 0.3);
        assert_eq!(snapshot.current_month, 6);
    }

    #[test]
    fn test_entities_bad_month_is_carried_as_zero() {
        let path = write_fixture(
            "entities_bad_month.csv",
            "nombre,co,ia,ua,da,mes\nRota SA,0.3,1000,100,50,junio\n",
        );

        let snapshots = read_entities_csv(&path).unwrap();
        assert_eq!(snapshots[0].current_month, 0);
        assert_eq!(snapshots[0].coefficient_objective, 0.3);
    }

    #[test]
    fn test_entities_missing_columns() {
        let path = write_fixture("entities_missing.csv", "nombre,mes\nSola SA,3\n");

        match read_entities_csv(&path) {
            Err(ProjectionError::MissingRequiredColumns { missing, .. }) => {
                assert!(missing.contains(&"coeficiente objetivo".to_string()));
                assert!(missing.contains(&"ingresoactual".to_string()));
            }
            other => panic!("expected MissingRequiredColumns, got {:?}", other),
        }
    }
}
