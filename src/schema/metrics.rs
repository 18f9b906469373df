//! Metric identifiers and metric specifications for sweep configurations.
//!
//! A sweep cell is either single-objective (one quality metric) or
//! multi-objective (a quality metric paired with a complexity metric). The
//! pairing is carried as a tagged union so that result routing never has to
//! inspect value shapes at runtime.

use serde::{Deserialize, Serialize};

use super::PipelineCandidate;

/// Task solved by the composed pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Classification,
    Regression,
    TimeSeriesForecasting,
    Clustering,
}

impl TaskType {
    /// Default quality metric for the task.
    ///
    /// Only classification and regression have one; the remaining task
    /// types fail with an explicit not-implemented error.
    pub fn default_quality_metric(self) -> Result<QualityMetric, MetricError> {
        match self {
            TaskType::Classification => Ok(QualityMetric::RocAuc),
            TaskType::Regression => Ok(QualityMetric::Rmse),
            other => Err(MetricError::NotImplemented { task: other }),
        }
    }
}

/// Quality (model performance) metric identifiers.
///
/// The optimizer minimizes, so classification metrics are stored negated in
/// fitness records; see [`crate::sweep::quality_sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMetric {
    RocAuc,
    RocAucPenalty,
    Rmse,
    RmsePenalty,
}

impl QualityMetric {
    /// Human-readable metric name, used in axis and objective labels.
    pub fn label(self) -> &'static str {
        match self {
            QualityMetric::RocAuc | QualityMetric::RocAucPenalty => "ROC-AUC",
            QualityMetric::Rmse | QualityMetric::RmsePenalty => "RMSE",
        }
    }

    /// Structural-penalty variant of this metric.
    pub fn penalized(self) -> QualityMetric {
        match self {
            QualityMetric::RocAuc | QualityMetric::RocAucPenalty => QualityMetric::RocAucPenalty,
            QualityMetric::Rmse | QualityMetric::RmsePenalty => QualityMetric::RmsePenalty,
        }
    }
}

/// Complexity (solution cost) metric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityMetric {
    /// Time spent fitting the pipeline.
    ComputationTime,
    /// Structural size of the pipeline graph.
    Structural,
}

impl ComplexityMetric {
    /// Evaluate the metric against a produced pipeline candidate.
    ///
    /// Used on demand for single-objective runs, where the optimizer does
    /// not report a complexity list of its own.
    pub fn evaluate(self, chain: &PipelineCandidate) -> f64 {
        match self {
            ComplexityMetric::ComputationTime => chain.fit_seconds,
            ComplexityMetric::Structural => chain.node_count as f64,
        }
    }
}

/// Objective layout for one sweep cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetricSpec {
    /// Single-objective: one quality metric.
    Scalar { quality: QualityMetric },
    /// Multi-objective: quality plus complexity.
    Pair {
        quality: QualityMetric,
        complexity: ComplexityMetric,
    },
}

impl MetricSpec {
    pub fn scalar(quality: QualityMetric) -> Self {
        MetricSpec::Scalar { quality }
    }

    pub fn pair(quality: QualityMetric, complexity: ComplexityMetric) -> Self {
        MetricSpec::Pair {
            quality,
            complexity,
        }
    }

    pub fn is_multi_objective(&self) -> bool {
        matches!(self, MetricSpec::Pair { .. })
    }

    pub fn quality(&self) -> QualityMetric {
        match self {
            MetricSpec::Scalar { quality } | MetricSpec::Pair { quality, .. } => *quality,
        }
    }

    pub fn complexity(&self) -> Option<ComplexityMetric> {
        match self {
            MetricSpec::Scalar { .. } => None,
            MetricSpec::Pair { complexity, .. } => Some(*complexity),
        }
    }
}

/// Metric specification across the scheme axis of a sweep.
///
/// Either every scheme shares one spec, or each scheme index carries its
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricMatrix {
    Uniform(MetricSpec),
    PerScheme(Vec<MetricSpec>),
}

impl MetricMatrix {
    /// The spec in effect for a scheme index.
    ///
    /// For `PerScheme` the index must be within the validated scheme count.
    pub fn for_scheme(&self, index: usize) -> &MetricSpec {
        match self {
            MetricMatrix::Uniform(spec) => spec,
            MetricMatrix::PerScheme(specs) => &specs[index],
        }
    }
}

/// Metric selection errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("default quality metric is not implemented for {task:?} tasks")]
    NotImplemented { task: TaskType },
}
