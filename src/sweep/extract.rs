//! Fitness history extraction and normalization.
//!
//! The optimizer stores minimized fitness values that come in two shapes
//! (scalar or objective vector). Extraction flattens both into plain
//! quality sequences with the task's sign convention applied:
//! classification quality is recovered by negation, regression quality is
//! taken as stored.

use crate::schema::{GenerationHistory, Individual, OptimizerState, TaskType};

/// History extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("individual {index} carries an empty fitness vector")]
    EmptyFitnessVector { index: usize },
}

/// Flat quality sequence for one population, in population order.
///
/// Vector fitness contributes its first component, scalar fitness
/// contributes itself; classification values are negated.
pub fn quality_sequence(
    population: &[Individual],
    task: TaskType,
) -> Result<Vec<f64>, ExtractError> {
    population
        .iter()
        .enumerate()
        .map(|(index, individual)| {
            let stored = individual
                .fitness
                .objective(0)
                .ok_or(ExtractError::EmptyFitnessVector { index })?;
            Ok(match task {
                TaskType::Classification => -stored,
                _ => stored,
            })
        })
        .collect()
}

/// Per-generation quality history for one run.
///
/// For multi-objective sweeps each generation entry concatenates the full
/// population's qualities with the archived non-dominated set's qualities
/// (when the archive has an entry for that generation). Single-objective
/// sweeps use the full population alone.
pub fn run_history(
    state: &OptimizerState,
    task: TaskType,
    multi_objective: bool,
) -> Result<GenerationHistory, ExtractError> {
    let mut history = Vec::with_capacity(state.individuals.len());

    for (generation, population) in state.individuals.iter().enumerate() {
        let mut qualities = quality_sequence(population, task)?;
        if multi_objective {
            if let Some(archived) = state.archive_history.get(generation) {
                qualities.extend(quality_sequence(archived, task)?);
            }
        }
        history.push(qualities);
    }

    Ok(history)
}
