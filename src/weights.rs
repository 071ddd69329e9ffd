use log::debug;

use crate::schema::{HistoricalRecord, WeightVector};
use crate::utils::MONTHS_PER_YEAR;

/// Aggregates historical records by calendar month and normalizes the totals
/// into one weight vector per metric.
///
/// Records with a month outside 1..=12 are dropped, not errors: historical
/// exports are messy and a stray row must not poison the whole dataset.
/// Years are not distinguished; month-of-year seasonality is assumed stable,
/// so all years stack onto the same 12 buckets.
pub fn load_weights(records: &[HistoricalRecord]) -> (WeightVector, WeightVector) {
    let mut income_totals = [0.0; MONTHS_PER_YEAR as usize];
    let mut deduction_totals = [0.0; MONTHS_PER_YEAR as usize];
    let mut dropped = 0usize;

    for record in records {
        if !(1..=MONTHS_PER_YEAR).contains(&record.month) {
            dropped += 1;
            continue;
        }

        let idx = (record.month - 1) as usize;
        income_totals[idx] += record.income;
        deduction_totals[idx] += record.deduction;
    }

    if dropped > 0 {
        debug!(
            "Dropped {} of {} historical records with out-of-range months",
            dropped,
            records.len()
        );
    }

    (
        WeightVector::from_monthly_totals(income_totals),
        WeightVector::from_monthly_totals(deduction_totals),
    )
}
