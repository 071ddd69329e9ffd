//! JSON persistence of computed entity records for downstream report and
//! chart consumers.
//!
//! The store is an explicit, optional sink/source: pipeline stages exchange
//! data through return values, and nothing in the crate reads this file as a
//! hidden integration point.

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::schema::{EntitySnapshot, EntitySummary, ForecastTotals};
use crate::utils::{validate_month, MONTHS_PER_YEAR};

/// One computed entity as persisted between the batch computation and the
/// rendering stage.
///
/// The record redundantly carries both `current_month` and
/// `months_remaining`; `validate` rejects records where the two drifted
/// apart, and `current_month` is the authoritative field everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityRecord {
    #[schemars(description = "Entity name, unique within the store")]
    pub name: String,

    #[schemars(description = "Projected income still to be generated this fiscal year")]
    pub future_income: f64,

    #[schemars(description = "Projected deductions still to be realized this fiscal year")]
    pub future_deductions: f64,

    #[schemars(description = "Target utility/income ratio the projection was sized against")]
    pub coefficient_objective: f64,

    #[schemars(description = "Observed utility/income ratio at the snapshot month")]
    pub utility_coefficient: f64,

    pub current_income: f64,
    pub current_utility: f64,
    pub current_deductions: f64,

    #[schemars(description = "Calendar month the accumulators run through (1-12)")]
    pub current_month: u32,

    #[schemars(description = "Months left in the fiscal year; must equal 12 - current_month")]
    pub months_remaining: u32,
}

impl EntityRecord {
    pub fn from_summary(summary: &EntitySummary, current_month: u32) -> Self {
        Self {
            name: summary.name.clone(),
            future_income: summary.future_income,
            future_deductions: summary.future_deductions,
            coefficient_objective: summary.coefficient_objective,
            utility_coefficient: summary.utility_coefficient,
            current_income: summary.current_income,
            current_utility: summary.current_utility,
            current_deductions: summary.current_deductions,
            current_month,
            months_remaining: summary.months_remaining,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_month(self.current_month)?;

        if self.coefficient_objective == 1.0 {
            return Err(ProjectionError::DivisionByTargetCoefficient);
        }

        let derived = MONTHS_PER_YEAR - self.current_month;
        if self.months_remaining != derived {
            return Err(ProjectionError::InconsistentRemainingMonths {
                name: self.name.clone(),
                stored: self.months_remaining,
                derived,
            });
        }

        Ok(())
    }

    pub fn totals(&self) -> ForecastTotals {
        ForecastTotals {
            future_income: self.future_income,
            future_deductions: self.future_deductions,
        }
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            name: self.name.clone(),
            current_income: self.current_income,
            current_utility: self.current_utility,
            current_deductions: self.current_deductions,
            coefficient_objective: self.coefficient_objective,
            current_month: self.current_month,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EntityRecord)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

pub fn save_records(path: impl AsRef<Path>, records: &[EntityRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// Loads and validates the store. Validation is not optional: a record whose
/// stored remaining-month count contradicts its current month would silently
/// shift every allocation by at least one month.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<EntityRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProjectionError::SourceNotFound(path.display().to_string()));
    }

    let json = fs::read_to_string(path)?;
    let records: Vec<EntityRecord> = serde_json::from_str(&json)?;

    for record in &records {
        record.validate()?;
    }

    Ok(records)
}

pub fn find_record<'a>(records: &'a [EntityRecord], name: &str) -> Result<&'a EntityRecord> {
    records
        .iter()
        .find(|record| record.name == name)
        .ok_or_else(|| ProjectionError::EntityNotFound(name.to_string()))
}
