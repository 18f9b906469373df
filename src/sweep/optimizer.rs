//! The external optimizer seam and a deterministic synthetic backend.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::schema::{
    Individual, MetricSpec, OptimizerState, PipelineCandidate, RunMetrics, RunResult, SchemeConfig,
    TaskType,
};

/// One optimizer invocation, fully described.
#[derive(Debug, Clone)]
pub struct OptimizerRequest {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    /// Computation-time budget the optimizer is responsible for honoring.
    pub time_budget_minutes: u64,
    pub population_size: usize,
    pub generations: usize,
    pub max_depth: usize,
    pub start_depth: usize,
    pub metric: MetricSpec,
    pub task: TaskType,
    pub config: SchemeConfig,
}

/// Failures raised by an optimizer backend.
///
/// The driver does not catch these; they abort the remaining sweep.
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("failed to read dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("optimizer backend error: {0}")]
    Backend(String),
}

/// External multi-objective pipeline optimizer.
///
/// Implementations run one full evolutionary search within the requested
/// time budget and report end-of-run metrics, the produced pipeline
/// candidates and the per-generation state.
pub trait PipelineOptimizer {
    fn run(&mut self, request: &OptimizerRequest) -> Result<RunResult, OptimizerError>;
}

/// Deterministic stand-in backend for wiring checks and tests.
///
/// Samples plausible quality trajectories from a seeded generator; it
/// performs no selection, crossover, mutation or model training. Result
/// shapes follow the request's metric spec, so the harness exercises both
/// the scalar and the paired routing paths.
#[derive(Debug)]
pub struct SyntheticOptimizer {
    rng: StdRng,
}

impl SyntheticOptimizer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Raw quality for generation `g` of `generations`, improving over
    /// time in the task's natural direction.
    fn raw_quality(&mut self, task: TaskType, g: usize, generations: usize) -> f64 {
        let progress = (g + 1) as f64 / generations as f64;
        match task {
            TaskType::Classification => {
                let auc = 0.55 + 0.3 * progress + self.rng.gen_range(-0.02..0.02);
                auc.clamp(0.5, 0.99)
            }
            _ => {
                let rmse = 1.2 - 0.8 * progress + self.rng.gen_range(-0.05..0.05);
                rmse.max(0.1)
            }
        }
    }

    /// Stored (minimized) fitness for a raw quality value.
    fn stored(task: TaskType, raw: f64) -> f64 {
        match task {
            TaskType::Classification => -raw,
            _ => raw,
        }
    }

    fn individual(&mut self, task: TaskType, raw: f64, multi_objective: bool) -> Individual {
        let stored = Self::stored(task, raw);
        if multi_objective {
            let complexity = self.rng.gen_range(1.0..8.0);
            Individual::vector(vec![stored, complexity])
        } else {
            Individual::scalar(stored)
        }
    }
}

impl Default for SyntheticOptimizer {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl PipelineOptimizer for SyntheticOptimizer {
    fn run(&mut self, request: &OptimizerRequest) -> Result<RunResult, OptimizerError> {
        let generations = request.generations.max(1);
        let population_size = request.population_size.max(2);
        let archive_size = (population_size / 4).max(1);
        let multi_objective = request.metric.is_multi_objective();

        let mut individuals = Vec::with_capacity(generations);
        let mut archive_history = Vec::with_capacity(generations);

        for g in 0..generations {
            let population: Vec<Individual> = (0..population_size)
                .map(|_| {
                    let raw = self.raw_quality(request.task, g, generations);
                    self.individual(request.task, raw, multi_objective)
                })
                .collect();

            let archive: Vec<Individual> = (0..archive_size)
                .map(|_| {
                    let raw = self.raw_quality(request.task, g, generations);
                    self.individual(request.task, raw, multi_objective)
                })
                .collect();

            individuals.push(population);
            archive_history.push(archive);
        }

        let chain_count = (population_size / 5).max(1);
        let max_depth = request.max_depth.max(1);
        let chains: Vec<PipelineCandidate> = (0..chain_count)
            .map(|_| {
                let depth = self.rng.gen_range(1..=max_depth);
                PipelineCandidate {
                    node_count: self.rng.gen_range(depth..=depth + 4),
                    depth,
                    fit_seconds: self.rng.gen_range(0.5..30.0),
                }
            })
            .collect();

        let quality: Vec<f64> = (0..chain_count)
            .map(|_| self.raw_quality(request.task, generations - 1, generations))
            .collect();
        let metrics = if multi_objective {
            let complexity = (0..chain_count)
                .map(|_| self.rng.gen_range(1.0..8.0))
                .collect();
            RunMetrics::Paired {
                quality,
                complexity,
            }
        } else {
            RunMetrics::Single(quality)
        };

        Ok(RunResult {
            metrics,
            chains,
            state: OptimizerState {
                archive_history,
                individuals,
            },
        })
    }
}
