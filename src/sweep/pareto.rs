//! Terminal Pareto front collection and cross-run downsampling.

use crate::schema::{OptimizerState, ParetoFrontSnapshot, TaskType};

use super::extract::{ExtractError, quality_sequence};

/// Pareto collection errors.
///
/// These indicate a malformed multi-objective result and abort the sweep,
/// same as optimizer failures.
#[derive(Debug, thiserror::Error)]
pub enum ParetoError {
    #[error("optimizer returned no archive history to snapshot")]
    EmptyArchiveHistory,
    #[error("archived individual {index} has no complexity objective")]
    MissingComplexityObjective { index: usize },
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Snapshot the final generation's non-dominated set.
///
/// Quality values go through the usual extraction (sign convention
/// applied); complexity values are the second fitness-vector component,
/// taken as stored.
pub fn collect_front(
    state: &OptimizerState,
    task: TaskType,
) -> Result<ParetoFrontSnapshot, ParetoError> {
    let front = state
        .archive_history
        .last()
        .ok_or(ParetoError::EmptyArchiveHistory)?;

    let quality = quality_sequence(front, task)?;
    let complexity = front
        .iter()
        .enumerate()
        .map(|(index, individual)| {
            individual
                .fitness
                .objective(1)
                .ok_or(ParetoError::MissingComplexityObjective { index })
        })
        .collect::<Result<Vec<f64>, ParetoError>>()?;

    Ok(ParetoFrontSnapshot {
        quality,
        complexity,
    })
}

/// Reduce repeated runs to one representative front per scheme group.
///
/// Snapshots must be in the driver's scheme-major, run-minor append order;
/// taking every `runs`-th snapshot starting at index 0 then keeps the
/// first recorded run of each group. With a single run per cell all
/// snapshots are kept.
pub fn downsample_fronts(
    fronts: Vec<ParetoFrontSnapshot>,
    runs: usize,
) -> Vec<ParetoFrontSnapshot> {
    if runs <= 1 {
        return fronts;
    }
    fronts.into_iter().step_by(runs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Individual;
    use proptest::prelude::*;

    fn snapshot(tag: f64) -> ParetoFrontSnapshot {
        ParetoFrontSnapshot {
            quality: vec![tag],
            complexity: vec![tag],
        }
    }

    #[test]
    fn test_collect_takes_last_archive_entry() {
        let state = OptimizerState {
            individuals: vec![],
            archive_history: vec![
                vec![Individual::vector(vec![-0.6, 4.0])],
                vec![
                    Individual::vector(vec![-0.8, 3.0]),
                    Individual::vector(vec![-0.7, 1.0]),
                ],
            ],
        };

        let front = collect_front(&state, TaskType::Classification).unwrap();
        assert_eq!(front.quality, vec![0.8, 0.7]);
        assert_eq!(front.complexity, vec![3.0, 1.0]);
    }

    #[test]
    fn test_complexity_not_sign_adjusted() {
        let state = OptimizerState {
            individuals: vec![],
            archive_history: vec![vec![Individual::vector(vec![0.4, -2.0])]],
        };

        let front = collect_front(&state, TaskType::Regression).unwrap();
        assert_eq!(front.quality, vec![0.4]);
        assert_eq!(front.complexity, vec![-2.0]);
    }

    #[test]
    fn test_empty_archive_history_rejected() {
        let state = OptimizerState::default();
        assert!(matches!(
            collect_front(&state, TaskType::Classification),
            Err(ParetoError::EmptyArchiveHistory)
        ));
    }

    #[test]
    fn test_scalar_fitness_rejected() {
        let state = OptimizerState {
            individuals: vec![],
            archive_history: vec![vec![Individual::scalar(-0.8)]],
        };
        assert!(matches!(
            collect_front(&state, TaskType::Classification),
            Err(ParetoError::MissingComplexityObjective { index: 0 })
        ));
    }

    #[test]
    fn test_downsample_keeps_first_run_of_each_group() {
        // 3 scheme groups x 4 runs, appended scheme-major.
        let fronts: Vec<ParetoFrontSnapshot> = (0..12).map(|i| snapshot(i as f64)).collect();

        let kept = downsample_fronts(fronts, 4);
        let tags: Vec<f64> = kept.iter().map(|f| f.quality[0]).collect();
        assert_eq!(tags, vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_single_run_keeps_everything() {
        let fronts: Vec<ParetoFrontSnapshot> = (0..3).map(|i| snapshot(i as f64)).collect();
        let kept = downsample_fronts(fronts.clone(), 1);
        assert_eq!(kept, fronts);
    }

    proptest! {
        #[test]
        fn prop_downsample_selects_multiples_of_runs(
            groups in 1usize..6,
            runs in 2usize..6,
        ) {
            let fronts: Vec<ParetoFrontSnapshot> =
                (0..groups * runs).map(|i| snapshot(i as f64)).collect();

            let kept = downsample_fronts(fronts, runs);
            prop_assert_eq!(kept.len(), groups);
            for (group, front) in kept.iter().enumerate() {
                prop_assert_eq!(front.quality[0], (group * runs) as f64);
            }
        }
    }
}
