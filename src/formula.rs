//! Closed-form projection of required future income and future deductions
//! from an entity's current-period accumulators and its target coefficient.
//!
//! All functions here are pure; month validation and the coefficient guard
//! are the only failure paths besides non-finite arithmetic, which is
//! surfaced rather than swallowed.

use crate::error::{ProjectionError, Result};
use crate::schema::{EntitySnapshot, ForecastTotals};
use crate::utils::{round_currency, validate_month, MONTHS_PER_YEAR};

/// Income the entity still needs to generate so that the year closes on the
/// target coefficient. Remaining-year deductions are projected linearly from
/// the accumulated ones: `deductions / current_month * (12 - current_month)`.
pub fn future_income(
    coefficient: f64,
    current_utility: f64,
    current_income: f64,
    current_deductions: f64,
    current_month: u32,
) -> Result<f64> {
    validate_month(current_month)?;

    if coefficient == 1.0 {
        return Err(ProjectionError::DivisionByTargetCoefficient);
    }

    let deductions_remaining = current_deductions / current_month as f64
        * (MONTHS_PER_YEAR - current_month) as f64;
    let projected =
        (coefficient * current_income - current_utility + deductions_remaining) / (1.0 - coefficient);

    if !projected.is_finite() {
        return Err(ProjectionError::NonFiniteProjection(format!(
            "future income with coefficient {} and income {}",
            coefficient, current_income
        )));
    }

    Ok(projected)
}

/// Deductions implied by the projected income at the target coefficient,
/// rounded to 2 decimals for currency display.
pub fn future_deductions(
    coefficient: f64,
    current_utility: f64,
    current_income: f64,
    future_income: f64,
) -> f64 {
    round_currency(current_utility + future_income - coefficient * (current_income + future_income))
}

/// Diagnostic ratio of accumulated utility to accumulated income.
/// Defined as 0 when the entity has no income yet.
pub fn utility_coefficient(current_utility: f64, current_income: f64) -> f64 {
    if current_income == 0.0 {
        0.0
    } else {
        current_utility / current_income
    }
}

/// Derives both forecast totals for one entity.
pub fn project(snapshot: &EntitySnapshot) -> Result<ForecastTotals> {
    let income = future_income(
        snapshot.coefficient_objective,
        snapshot.current_utility,
        snapshot.current_income,
        snapshot.current_deductions,
        snapshot.current_month,
    )?;

    let deductions = future_deductions(
        snapshot.coefficient_objective,
        snapshot.current_utility,
        snapshot.current_income,
        income,
    );

    if !deductions.is_finite() {
        return Err(ProjectionError::NonFiniteProjection(format!(
            "future deductions for entity '{}'",
            snapshot.name
        )));
    }

    Ok(ForecastTotals {
        future_income: income,
        future_deductions: deductions,
    })
}
