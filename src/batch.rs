//! Runs the projection over a whole portfolio of entities.
//!
//! Per-entity failures are recorded on that entity's result and never abort
//! the batch; source data is end-user-provided and frequently dirty, and a
//! silently shortened batch would be indistinguishable from a complete one.

use log::{debug, info};
use serde::Serialize;

use crate::allocator;
use crate::error::{ProjectionError, Result};
use crate::formula;
use crate::schema::{AllocationTable, EntitySnapshot, EntitySummary, WeightVector};
use crate::utils::months_remaining;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EntityOutcome {
    /// The table is empty when the entity's snapshot runs through December;
    /// kept so consumers can tell "nothing left to project" from "no data".
    Projected {
        summary: EntitySummary,
        table: AllocationTable,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityResult {
    pub name: String,
    pub outcome: EntityOutcome,
}

impl EntityResult {
    pub fn table(&self) -> Option<&AllocationTable> {
        match &self.outcome {
            EntityOutcome::Projected { table, .. } => Some(table),
            EntityOutcome::Failed { .. } => None,
        }
    }
}

/// Projects every entity against the shared weight vectors. Output order
/// matches input order; failing entities are carried as `Failed` results.
pub fn run_all(
    entities: &[EntitySnapshot],
    income_weights: &WeightVector,
    deduction_weights: &WeightVector,
) -> Vec<EntityResult> {
    info!("Running monthly projection for {} entities", entities.len());

    entities
        .iter()
        .map(|snapshot| {
            let outcome = match project_entity(snapshot, income_weights, deduction_weights) {
                Ok((summary, table)) => EntityOutcome::Projected { summary, table },
                Err(err) => {
                    debug!("Projection failed for entity '{}': {}", snapshot.name, err);
                    EntityOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };

            EntityResult {
                name: snapshot.name.clone(),
                outcome,
            }
        })
        .collect()
}

/// Projects a single named entity, for callers that expect rows back.
/// Fails with `EntityNotFound` when the name has no match and with
/// `EmptyProjectionWindow` when the match has no months left to project.
pub fn run_for(
    name: &str,
    entities: &[EntitySnapshot],
    income_weights: &WeightVector,
    deduction_weights: &WeightVector,
) -> Result<(EntitySummary, AllocationTable)> {
    let snapshot = entities
        .iter()
        .find(|snapshot| snapshot.name == name)
        .ok_or_else(|| ProjectionError::EntityNotFound(name.to_string()))?;

    let (summary, table) = project_entity(snapshot, income_weights, deduction_weights)?;
    if table.is_empty() {
        return Err(ProjectionError::EmptyProjectionWindow(name.to_string()));
    }

    Ok((summary, table))
}

fn project_entity(
    snapshot: &EntitySnapshot,
    income_weights: &WeightVector,
    deduction_weights: &WeightVector,
) -> Result<(EntitySummary, AllocationTable)> {
    let totals = formula::project(snapshot)?;
    let remaining = months_remaining(snapshot.current_month)?;
    let table = allocator::allocate(&totals, remaining, income_weights, deduction_weights)?;

    let summary = EntitySummary {
        name: snapshot.name.clone(),
        future_income: totals.future_income,
        future_deductions: totals.future_deductions,
        coefficient_objective: snapshot.coefficient_objective,
        utility_coefficient: formula::utility_coefficient(
            snapshot.current_utility,
            snapshot.current_income,
        ),
        months_remaining: remaining,
        current_income: snapshot.current_income,
        current_utility: snapshot.current_utility,
        current_deductions: snapshot.current_deductions,
    };

    Ok((summary, table))
}
