//! # Fiscal Projector
//!
//! A library for estimating a taxpayer/company's required future income and
//! future deductions for the remainder of a fiscal year, then distributing
//! those year-end totals across the remaining calendar months in proportion
//! to historical monthly patterns.
//!
//! ## Core Concepts
//!
//! - **Forecast totals**: a closed-form formula derives the income still
//!   needed (and the deductions it implies) from the entity's current-period
//!   accumulators and its target utility/income coefficient
//! - **Weight vectors**: historical rows are summed per calendar month and
//!   normalized into one 12-month weight vector per metric, with a uniform
//!   1/12 fallback when a metric's history is all zero
//! - **Monthly allocation**: the yearly weights are restricted to the months
//!   still ahead, renormalized over that window, and multiplied through the
//!   totals, so the per-month amounts always add back up to the totals
//! - **Batch tolerance**: one malformed entity is recorded as a failed result
//!   and never aborts the rest of the portfolio
//!
//! ## Example
//!
//! ```rust,ignore
//! use fiscal_projector::*;
//!
//! let history = read_history_csv("historico.csv")?;
//! let entities = read_entities_csv("empresas.csv")?;
//!
//! let results = project_portfolio(&entities, &history);
//! for result in &results {
//!     match &result.outcome {
//!         EntityOutcome::Projected { summary, table } => {
//!             println!("{}: {} months projected", summary.name, table.len())
//!         }
//!         EntityOutcome::Failed { reason } => {
//!             println!("{}: {}", result.name, reason)
//!         }
//!     }
//! }
//! ```

pub mod allocator;
pub mod batch;
pub mod error;
pub mod formula;
pub mod ingestion;
pub mod schema;
pub mod store;
pub mod utils;
pub mod weights;

pub use allocator::{allocate, allocated_deductions, allocated_income};
pub use batch::{run_all, run_for, EntityOutcome, EntityResult};
pub use error::{ProjectionError, Result};
pub use formula::{future_deductions, future_income, project, utility_coefficient};
pub use ingestion::{read_entities_csv, read_history_csv};
pub use schema::*;
pub use store::{find_record, load_records, save_records, EntityRecord};
pub use weights::load_weights;

use log::{debug, info};
use std::path::Path;

pub struct PortfolioProjector;

impl PortfolioProjector {
    /// Projects every entity against weights derived from the shared
    /// historical dataset.
    pub fn project(
        entities: &[EntitySnapshot],
        history: &[HistoricalRecord],
    ) -> Vec<EntityResult> {
        info!(
            "Projecting {} entities against {} historical records",
            entities.len(),
            history.len()
        );

        let (income_weights, deduction_weights) = weights::load_weights(history);
        debug!(
            "Income weights sum {:.9}, deduction weights sum {:.9}",
            income_weights.sum(),
            deduction_weights.sum()
        );

        batch::run_all(entities, &income_weights, &deduction_weights)
    }

    /// File-based convenience wiring: reads both CSV sources and runs the
    /// batch. Failures loading either source are fatal; there is nothing
    /// meaningful to compute without weights or entities.
    pub fn project_from_files(
        entity_csv: impl AsRef<Path>,
        history_csv: impl AsRef<Path>,
    ) -> Result<Vec<EntityResult>> {
        let entities = ingestion::read_entities_csv(entity_csv)?;
        let history = ingestion::read_history_csv(history_csv)?;
        Ok(Self::project(&entities, &history))
    }
}

pub fn project_portfolio(
    entities: &[EntitySnapshot],
    history: &[HistoricalRecord],
) -> Vec<EntityResult> {
    PortfolioProjector::project(entities, history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, month: u32) -> EntitySnapshot {
        EntitySnapshot {
            name: name.to_string(),
            current_income: 100_000.0,
            current_utility: 20_000.0,
            current_deductions: 6_000.0,
            coefficient_objective: 0.3,
            current_month: month,
        }
    }

    fn seasonal_history() -> Vec<HistoricalRecord> {
        (1..=12)
            .map(|month| HistoricalRecord {
                month,
                income: 100.0 * month as f64,
                deduction: 50.0,
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_projection() {
        let entities = vec![snapshot("ACME Corp", 6), snapshot("Cerrada SA", 12)];
        let results = project_portfolio(&entities, &seasonal_history());

        assert_eq!(results.len(), 2);

        match &results[0].outcome {
            EntityOutcome::Projected { summary, table } => {
                assert!((summary.future_income - 22_857.14).abs() < 0.01);
                assert_eq!(table.len(), 6);
                assert!((allocated_income(table) - summary.future_income).abs() < 1e-6);
                // Uniform deduction history: flat split over the window.
                let per_month = summary.future_deductions / 6.0;
                for row in table {
                    assert!((row.deduction_allocation - per_month).abs() < 1e-6);
                }
            }
            EntityOutcome::Failed { reason } => panic!("unexpected failure: {}", reason),
        }

        assert!(results[1].table().is_some_and(|table| table.is_empty()));
    }

    #[test]
    fn test_no_cross_entity_leakage() {
        // Summing a month across entities must equal summing each entity's
        // contribution to that month independently.
        let entities = vec![
            snapshot("Alfa SA", 6),
            snapshot("Beta SA", 6),
            snapshot("Gamma SA", 9),
        ];
        let history = seasonal_history();
        let results = project_portfolio(&entities, &history);

        let mut by_month = [0.0f64; 12];
        let mut total_allocated = 0.0;
        for result in &results {
            if let Some(table) = result.table() {
                for row in table {
                    by_month[(row.month - 1) as usize] += row.income_allocation;
                    total_allocated += row.income_allocation;
                }
            }
        }

        let independent_total: f64 = entities
            .iter()
            .map(|entity| {
                let single = project_portfolio(std::slice::from_ref(entity), &history);
                single[0]
                    .table()
                    .map(allocated_income)
                    .unwrap_or(0.0)
            })
            .sum();

        assert!((by_month.iter().sum::<f64>() - total_allocated).abs() < 1e-9);
        assert!((total_allocated - independent_total).abs() < 1e-6);
    }

    #[test]
    fn test_empty_history_still_projects_uniformly() {
        let results = project_portfolio(&[snapshot("Nueva SA", 10)], &[]);

        match &results[0].outcome {
            EntityOutcome::Projected { summary, table } => {
                assert_eq!(table.len(), 2);
                assert!((table[0].income_weight_pct - 50.0).abs() < 1e-9);
                assert!(
                    (allocated_deductions(table) - summary.future_deductions).abs() < 1e-6
                );
            }
            EntityOutcome::Failed { reason } => panic!("unexpected failure: {}", reason),
        }
    }
}
