//! Result types returned by the optimizer and accumulated by the sweep.

use serde::{Deserialize, Serialize};

/// Fitness stored for one individual.
///
/// Scalar for single-objective runs, a fixed-length objective vector for
/// multi-objective runs. Values are the optimizer's minimized objectives:
/// classification quality is stored negated and recovered by the history
/// extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitnessRecord {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl FitnessRecord {
    /// Objective value at `index`, treating a scalar as a one-element
    /// vector.
    pub fn objective(&self, index: usize) -> Option<f64> {
        match self {
            FitnessRecord::Scalar(value) => (index == 0).then_some(*value),
            FitnessRecord::Vector(values) => values.get(index).copied(),
        }
    }

    pub fn is_multi_objective(&self) -> bool {
        matches!(self, FitnessRecord::Vector(_))
    }
}

/// One member of an optimizer population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub fitness: FitnessRecord,
}

impl Individual {
    pub fn scalar(fitness: f64) -> Self {
        Self {
            fitness: FitnessRecord::Scalar(fitness),
        }
    }

    pub fn vector(objectives: Vec<f64>) -> Self {
        Self {
            fitness: FitnessRecord::Vector(objectives),
        }
    }
}

/// A full population at one generation.
pub type Population = Vec<Individual>;

/// A pipeline candidate produced by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineCandidate {
    /// Number of model nodes in the pipeline graph.
    pub node_count: usize,
    /// Depth of the pipeline graph.
    pub depth: usize,
    /// Time spent fitting the pipeline, in seconds.
    pub fit_seconds: f64,
}

/// End-of-run metric values, one entry per produced chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunMetrics {
    /// Single-objective run: one quality value per chain.
    Single(Vec<f64>),
    /// Multi-objective run: quality and complexity values per chain.
    Paired {
        quality: Vec<f64>,
        complexity: Vec<f64>,
    },
}

/// Per-generation state handed back by the optimizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizerState {
    /// Non-dominated set per generation.
    pub archive_history: Vec<Population>,
    /// Full population per generation, before archive filtering.
    pub individuals: Vec<Population>,
}

/// Everything one optimizer invocation returns.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub metrics: RunMetrics,
    pub chains: Vec<PipelineCandidate>,
    pub state: OptimizerState,
}

/// Terminal Pareto front of one run: parallel quality and complexity lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoFrontSnapshot {
    pub quality: Vec<f64>,
    pub complexity: Vec<f64>,
}

/// Per-scheme accumulator that preserves the driver's run order.
///
/// Items are appended in the exact (time budget, scheme index, run)
/// enumeration order of the sweep; within one scheme slot they are run
/// histories in completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeSeries<T> {
    per_scheme: Vec<Vec<T>>,
}

impl<T> SchemeSeries<T> {
    pub fn new(scheme_count: usize) -> Self {
        Self {
            per_scheme: (0..scheme_count).map(|_| Vec::new()).collect(),
        }
    }

    /// Append one run's worth of data under a scheme index.
    pub fn push(&mut self, scheme_index: usize, item: T) {
        self.per_scheme[scheme_index].push(item);
    }

    pub fn scheme(&self, scheme_index: usize) -> &[T] {
        &self.per_scheme[scheme_index]
    }

    pub fn scheme_count(&self) -> usize {
        self.per_scheme.len()
    }

    /// Total items across all schemes.
    pub fn len(&self) -> usize {
        self.per_scheme.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_scheme.iter().all(Vec::is_empty)
    }
}

/// Per-generation quality values for one run: `[generation][individual]`.
pub type GenerationHistory = Vec<Vec<f64>>;

/// Per-generation fitness records for one run.
pub type PopulationTrace = Vec<Vec<FitnessRecord>>;

/// Quality-over-generations aggregate for the whole sweep.
pub type HistoryAggregate = SchemeSeries<GenerationHistory>;

/// Raw fitness-record aggregate for the whole sweep.
pub type IndividualsAggregate = SchemeSeries<PopulationTrace>;

/// Retained archive histories, used for hypervolume comparison.
pub type ArchiveAggregate = SchemeSeries<Vec<Population>>;

/// One tabular output row, written per (scheme, run, produced chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub scheme_index: usize,
    pub scheme_label: String,
    pub run: usize,
    pub complexity: f64,
    pub time_budget_minutes: u64,
    pub is_regularized: bool,
    /// Quality rounded to 4 decimals.
    pub quality: f64,
    pub node_count: usize,
    pub depth: usize,
}

impl ResultRow {
    /// Round a quality value to the 4-decimal precision used in rows.
    pub fn round_quality(quality: f64) -> f64 {
        (quality * 1e4).round() / 1e4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_access() {
        let scalar = FitnessRecord::Scalar(-0.82);
        assert_eq!(scalar.objective(0), Some(-0.82));
        assert_eq!(scalar.objective(1), None);

        let vector = FitnessRecord::Vector(vec![-0.82, 3.0]);
        assert_eq!(vector.objective(0), Some(-0.82));
        assert_eq!(vector.objective(1), Some(3.0));
        assert_eq!(vector.objective(2), None);
    }

    #[test]
    fn test_scheme_series_order() {
        let mut series: SchemeSeries<u32> = SchemeSeries::new(2);
        series.push(0, 10);
        series.push(1, 20);
        series.push(0, 11);

        assert_eq!(series.scheme(0), &[10, 11]);
        assert_eq!(series.scheme(1), &[20]);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_quality_rounding() {
        assert_eq!(ResultRow::round_quality(0.823456), 0.8235);
        assert_eq!(ResultRow::round_quality(-0.00004), -0.0);
        assert_eq!(ResultRow::round_quality(0.5), 0.5);
    }

    #[test]
    fn test_record_serialization() {
        let record = FitnessRecord::Vector(vec![-0.9, 2.0]);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: FitnessRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
