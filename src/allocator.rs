//! Distributes an entity's forecast totals over its remaining calendar
//! months in proportion to the historical weight vectors.

use crate::error::Result;
use crate::schema::{AllocationRow, AllocationTable, ForecastTotals, WeightVector};
use crate::utils::projected_months;

/// Spreads `totals` over the last `months_remaining` months of the year.
///
/// The yearly weights are restricted to the projected window and each subset
/// is renormalized independently to sum to 1; without that rescaling the
/// allocations would only add up to the window's share of the year. A subset
/// that sums to zero falls back to a uniform split over exactly the selected
/// months.
///
/// `months_remaining == 0` is a defined no-op and returns an empty table.
pub fn allocate(
    totals: &ForecastTotals,
    months_remaining: u32,
    income_weights: &WeightVector,
    deduction_weights: &WeightVector,
) -> Result<AllocationTable> {
    let months = projected_months(months_remaining)?;
    if months.is_empty() {
        return Ok(Vec::new());
    }

    let income_shares = restrict_and_renormalize(income_weights, &months);
    let deduction_shares = restrict_and_renormalize(deduction_weights, &months);

    let table = months
        .iter()
        .enumerate()
        .map(|(idx, &month)| AllocationRow {
            month,
            income_weight_pct: income_shares[idx] * 100.0,
            income_allocation: totals.future_income * income_shares[idx],
            deduction_weight_pct: deduction_shares[idx] * 100.0,
            deduction_allocation: totals.future_deductions * deduction_shares[idx],
        })
        .collect();

    Ok(table)
}

fn restrict_and_renormalize(weights: &WeightVector, months: &[u32]) -> Vec<f64> {
    let subset: Vec<f64> = months
        .iter()
        .map(|&month| weights.get(month).unwrap_or(0.0))
        .collect();

    let total: f64 = subset.iter().sum();
    if total <= 0.0 {
        return vec![1.0 / months.len() as f64; months.len()];
    }

    subset.into_iter().map(|weight| weight / total).collect()
}

pub fn allocated_income(table: &AllocationTable) -> f64 {
    table.iter().map(|row| row.income_allocation).sum()
}

pub fn allocated_deductions(table: &AllocationTable) -> f64 {
    table.iter().map(|row| row.deduction_allocation).sum()
}
