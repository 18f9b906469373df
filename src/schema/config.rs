//! Sweep plan and per-scheme configuration types.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{MetricMatrix, MetricSpec, TaskType};

/// Named evolutionary-search strategy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneticSchemeType {
    Generational,
    SteadyState,
    ParameterFree,
}

impl GeneticSchemeType {
    /// Scheme name as it appears in labels and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            GeneticSchemeType::Generational => "generational",
            GeneticSchemeType::SteadyState => "steady_state",
            GeneticSchemeType::ParameterFree => "parameter_free",
        }
    }
}

/// Survivor/parent selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionType {
    Tournament,
    Nsga2,
    Spea2,
}

/// Crossover operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    OnePoint,
    Subtree,
}

/// Mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    Simple,
    Growth,
    Reduce,
}

/// Complexity-shrinking policy over generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegularizationType {
    None,
    Decremental,
}

impl RegularizationType {
    pub fn is_regularized(self) -> bool {
        matches!(self, RegularizationType::Decremental)
    }
}

/// Crossover and mutation operator sets shared by every cell of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSet {
    pub crossovers: Vec<CrossoverType>,
    pub mutations: Vec<MutationType>,
}

impl Default for OperatorSet {
    fn default() -> Self {
        Self {
            crossovers: vec![CrossoverType::OnePoint, CrossoverType::Subtree],
            mutations: vec![
                MutationType::Simple,
                MutationType::Growth,
                MutationType::Reduce,
            ],
        }
    }
}

/// Outer-loop computation-time budget, in minutes.
///
/// The sweep body runs for `step, 2*step, ..` up to and including `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBudget {
    pub step_minutes: u64,
    pub max_minutes: u64,
}

impl TimeBudget {
    /// Number of outer-loop iterations this budget produces.
    pub fn iterations(self) -> u64 {
        self.max_minutes / self.step_minutes
    }
}

/// Concrete optimizer configuration for one sweep cell.
///
/// Built by the configuration matrix builder; the operator set is the one
/// `Arc` resolved before the sweep began, shared by every cell.
#[derive(Debug, Clone)]
pub struct SchemeConfig {
    pub genetic_scheme: GeneticSchemeType,
    pub selection: Vec<SelectionType>,
    pub operators: Arc<OperatorSet>,
    pub regularization: RegularizationType,
    pub auto_depth_configuration: bool,
    pub max_depth: usize,
    pub start_depth: usize,
    pub population_size: usize,
    pub metric: MetricSpec,
}

/// Full description of one sweep: the scheme axis, the shared parameters
/// and the output surface.
///
/// The per-scheme sequences (`labels`, `schemes`, `selection`,
/// `depth_config`, `max_depths`, `start_depths`, `population_sizes`) are
/// parallel and must have equal lengths; `validate` checks this.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Dataset label; output file names are derived from it.
    pub dataset: String,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    /// Directory that receives the tabular output and snapshots.
    pub output_root: PathBuf,
    pub task: TaskType,
    /// Display label per scheme index.
    pub labels: Vec<String>,
    pub schemes: Vec<GeneticSchemeType>,
    /// Ordered selection strategies per scheme index.
    pub selection: Vec<Vec<SelectionType>>,
    /// Automatic depth configuration flag per scheme index.
    pub depth_config: Vec<bool>,
    pub max_depths: Vec<usize>,
    pub start_depths: Vec<usize>,
    pub population_sizes: Vec<usize>,
    pub metrics: MetricMatrix,
    /// Caller-supplied operator sets; `None` resolves to the fixed
    /// defaults exactly once, before the sweep begins.
    pub operators: Option<OperatorSet>,
    pub regularization: RegularizationType,
    /// Generation count handed to the optimizer.
    pub generations: usize,
    /// Repetitions per (time budget, scheme) cell.
    pub runs: usize,
    pub budget: TimeBudget,
    /// Record terminal Pareto fronts and compare them after the sweep.
    pub collect_pareto: bool,
    /// Retain archive histories and compare hypervolumes after the sweep.
    pub compare_hypervolume: bool,
    /// Objective display names for Pareto front comparison.
    pub objective_names: (String, String),
}

impl SweepPlan {
    pub fn scheme_count(&self) -> usize {
        self.schemes.len()
    }

    /// Validate plan coherence.
    pub fn validate(&self) -> Result<(), PlanError> {
        let expected = self.schemes.len();
        if expected == 0 {
            return Err(PlanError::EmptySchemes);
        }

        let check = |name: &'static str, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(PlanError::MismatchedSequence {
                    name,
                    expected,
                    actual,
                })
            }
        };
        check("labels", self.labels.len())?;
        check("selection", self.selection.len())?;
        check("depth_config", self.depth_config.len())?;
        check("max_depths", self.max_depths.len())?;
        check("start_depths", self.start_depths.len())?;
        check("population_sizes", self.population_sizes.len())?;

        if let MetricMatrix::PerScheme(specs) = &self.metrics {
            if specs.len() != expected {
                return Err(PlanError::MetricCountMismatch {
                    expected,
                    actual: specs.len(),
                });
            }
        }

        if self.runs == 0 {
            return Err(PlanError::ZeroRuns);
        }
        if self.generations == 0 {
            return Err(PlanError::ZeroGenerations);
        }
        if self.budget.step_minutes == 0 {
            return Err(PlanError::ZeroBudgetStep);
        }

        Ok(())
    }
}

/// Sweep plan validation errors.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("sweep plan declares no genetic schemes")]
    EmptySchemes,
    #[error("sequence `{name}` has {actual} entries for {expected} schemes")]
    MismatchedSequence {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("per-scheme metrics declare {actual} specs for {expected} schemes")]
    MetricCountMismatch { expected: usize, actual: usize },
    #[error("run count must be non-zero")]
    ZeroRuns,
    #[error("generation count must be non-zero")]
    ZeroGenerations,
    #[error("time budget step must be non-zero")]
    ZeroBudgetStep,
}
