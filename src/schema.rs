use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::MONTHS_PER_YEAR;

/// One row of the historical dataset, typed at the ingestion boundary.
/// Several records may share a month (one per historical year); they are
/// summed, not averaged, before weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoricalRecord {
    #[schemars(description = "Calendar month the amounts belong to (1 = January, 12 = December)")]
    pub month: u32,

    #[schemars(description = "Income booked in this month")]
    pub income: f64,

    #[schemars(description = "Deductions booked in this month")]
    pub deduction: f64,
}

/// Normalized historical proportion of a metric attributable to each calendar
/// month. Always dense over months 1..=12; sums to 1.0 whenever the source
/// total was non-zero, and is exactly uniform (1/12 each) otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightVector([f64; MONTHS_PER_YEAR as usize]);

impl WeightVector {
    pub fn uniform() -> Self {
        Self([1.0 / MONTHS_PER_YEAR as f64; MONTHS_PER_YEAR as usize])
    }

    /// Normalizes per-month totals into weights. A zero yearly total carries
    /// no seasonal information, so it maps to the uniform vector instead of
    /// dividing by zero.
    pub fn from_monthly_totals(totals: [f64; MONTHS_PER_YEAR as usize]) -> Self {
        let total: f64 = totals.iter().sum();
        if total <= 0.0 {
            return Self::uniform();
        }

        let mut weights = totals;
        for weight in &mut weights {
            *weight /= total;
        }
        Self(weights)
    }

    pub fn get(&self, month: u32) -> Option<f64> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return None;
        }
        Some(self.0[(month - 1) as usize])
    }

    /// Iterates `(month, weight)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, &weight)| (idx as u32 + 1, weight))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// A taxpayer/company's current-period figures. Immutable input to the
/// financial formula; produced by CSV ingestion or constructed directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySnapshot {
    #[schemars(description = "Entity name, unique within a batch")]
    pub name: String,

    #[schemars(description = "Income accumulated from the start of the fiscal year to date")]
    pub current_income: f64,

    #[schemars(description = "Utility accumulated from the start of the fiscal year to date")]
    pub current_utility: f64,

    #[schemars(description = "Deductions accumulated from the start of the fiscal year to date")]
    pub current_deductions: f64,

    #[schemars(
        description = "Target utility/income ratio used to size the projection. Must be below 1; the formula divides by (1 - coefficient)."
    )]
    pub coefficient_objective: f64,

    #[schemars(description = "Calendar month the accumulators run through (1-12)")]
    pub current_month: u32,
}

/// Projected year-end totals still to be realized in the remaining months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastTotals {
    pub future_income: f64,

    #[schemars(description = "Rounded to 2 decimals for currency display")]
    pub future_deductions: f64,
}

/// Scalar summary figures for one entity, exposed alongside its allocation
/// table for report and chart consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySummary {
    pub name: String,
    pub future_income: f64,
    pub future_deductions: f64,
    pub coefficient_objective: f64,

    #[schemars(description = "Diagnostic ratio current_utility / current_income; 0 when income is 0")]
    pub utility_coefficient: f64,

    pub months_remaining: u32,
    pub current_income: f64,
    pub current_utility: f64,
    pub current_deductions: f64,
}

/// One projected month for one entity. Weight percentages are carried at
/// x100 scale, matching the tabular output consumed by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AllocationRow {
    pub month: u32,
    pub income_weight_pct: f64,
    pub income_allocation: f64,
    pub deduction_weight_pct: f64,
    pub deduction_allocation: f64,
}

/// Per-entity allocation rows, ordered by ascending month. Empty when the
/// entity has no months left to project.
pub type AllocationTable = Vec<AllocationRow>;
