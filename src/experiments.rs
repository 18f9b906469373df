//! Named sweep configurations.
//!
//! Each constructor produces a ready-to-run [`SweepPlan`] for one study:
//! the scheme axis, its labels and metrics, and the comparison flags. The
//! shared defaults (single 800-minute budget iteration, 30 generations,
//! populations of 20, depth 2..=3) are common to all studies.

use std::path::PathBuf;

use crate::schema::{
    ComplexityMetric, GeneticSchemeType, MetricError, MetricMatrix, MetricSpec, QualityMetric,
    RegularizationType, SelectionType, SweepPlan, TaskType, TimeBudget,
};

const DEFAULT_GENERATIONS: usize = 30;
const DEFAULT_POPULATION_SIZE: usize = 20;
const DEFAULT_MAX_DEPTH: usize = 3;
const DEFAULT_START_DEPTH: usize = 2;
const DEFAULT_BUDGET: TimeBudget = TimeBudget {
    step_minutes: 800,
    max_minutes: 800,
};

struct StudyAxis {
    labels: Vec<String>,
    schemes: Vec<GeneticSchemeType>,
    selection: Vec<Vec<SelectionType>>,
    depth_config: Vec<bool>,
    metrics: MetricMatrix,
    runs: usize,
    collect_pareto: bool,
    compare_hypervolume: bool,
}

fn plan_from_axis(
    train_path: PathBuf,
    test_path: PathBuf,
    dataset: &str,
    output_root: PathBuf,
    task: TaskType,
    quality: QualityMetric,
    axis: StudyAxis,
) -> SweepPlan {
    let scheme_count = axis.schemes.len();
    SweepPlan {
        dataset: dataset.to_string(),
        train_path,
        test_path,
        output_root,
        task,
        labels: axis.labels,
        schemes: axis.schemes,
        selection: axis.selection,
        depth_config: axis.depth_config,
        max_depths: vec![DEFAULT_MAX_DEPTH; scheme_count],
        start_depths: vec![DEFAULT_START_DEPTH; scheme_count],
        population_sizes: vec![DEFAULT_POPULATION_SIZE; scheme_count],
        metrics: axis.metrics,
        operators: None,
        regularization: RegularizationType::Decremental,
        generations: DEFAULT_GENERATIONS,
        runs: axis.runs,
        budget: DEFAULT_BUDGET,
        collect_pareto: axis.collect_pareto,
        compare_hypervolume: axis.compare_hypervolume,
        objective_names: (
            format!("{} metric", quality.label()),
            "Computation time".to_string(),
        ),
    }
}

/// Self-configuring depth control vs. fixed maximum depth, across the
/// parameter-free and steady-state schemes.
pub fn self_config_vs_fixed_params(
    train_path: impl Into<PathBuf>,
    test_path: impl Into<PathBuf>,
    dataset: &str,
    output_root: impl Into<PathBuf>,
    task: TaskType,
) -> Result<SweepPlan, MetricError> {
    let quality = task.default_quality_metric()?;
    let schemes = vec![
        GeneticSchemeType::ParameterFree,
        GeneticSchemeType::ParameterFree,
        GeneticSchemeType::SteadyState,
        GeneticSchemeType::SteadyState,
    ];
    let depth_config = vec![false, true, false, true];
    let labels = schemes
        .iter()
        .zip(&depth_config)
        .map(|(scheme, auto_depth)| {
            let suffix = if *auto_depth { "" } else { " with fixed max_depth" };
            format!("{} GP{suffix}", scheme.as_str())
        })
        .collect();
    let scheme_count = schemes.len();

    Ok(plan_from_axis(
        train_path.into(),
        test_path.into(),
        dataset,
        output_root.into(),
        task,
        quality,
        StudyAxis {
            labels,
            schemes,
            selection: vec![vec![SelectionType::Spea2]; scheme_count],
            depth_config,
            metrics: MetricMatrix::PerScheme(vec![
                MetricSpec::pair(
                    quality,
                    ComplexityMetric::ComputationTime
                );
                scheme_count
            ]),
            runs: 3,
            collect_pareto: true,
            compare_hypervolume: true,
        },
    ))
}

/// Single-objective, penalty-adjusted single-objective and true
/// multi-objective formulations of the same steady-state search.
pub fn single_vs_multi_objective(
    train_path: impl Into<PathBuf>,
    test_path: impl Into<PathBuf>,
    dataset: &str,
    output_root: impl Into<PathBuf>,
    task: TaskType,
) -> Result<SweepPlan, MetricError> {
    let quality = task.default_quality_metric()?;
    let scheme = GeneticSchemeType::SteadyState;
    let labels = vec![
        format!("{} single-obj GP", scheme.as_str()),
        format!("{} single-obj penalty", scheme.as_str()),
        format!("{} multi-obj", scheme.as_str()),
    ];

    Ok(plan_from_axis(
        train_path.into(),
        test_path.into(),
        dataset,
        output_root.into(),
        task,
        quality,
        StudyAxis {
            labels,
            schemes: vec![scheme; 3],
            selection: vec![
                vec![SelectionType::Tournament],
                vec![SelectionType::Tournament],
                vec![SelectionType::Spea2],
            ],
            depth_config: vec![false; 3],
            metrics: MetricMatrix::PerScheme(vec![
                MetricSpec::scalar(quality),
                MetricSpec::scalar(quality.penalized()),
                MetricSpec::pair(quality, ComplexityMetric::Structural),
            ]),
            runs: 4,
            collect_pareto: false,
            compare_hypervolume: false,
        },
    ))
}

/// NSGA-II vs. SPEA2 selection under the parameter-free scheme.
pub fn multi_objective_selections(
    train_path: impl Into<PathBuf>,
    test_path: impl Into<PathBuf>,
    dataset: &str,
    output_root: impl Into<PathBuf>,
    task: TaskType,
) -> Result<SweepPlan, MetricError> {
    let quality = task.default_quality_metric()?;
    let scheme = GeneticSchemeType::ParameterFree;
    let labels = vec![
        format!("{} GP with nsga selection", scheme.as_str()),
        format!("{} GP with spea2 selection", scheme.as_str()),
    ];

    Ok(plan_from_axis(
        train_path.into(),
        test_path.into(),
        dataset,
        output_root.into(),
        task,
        quality,
        StudyAxis {
            labels,
            schemes: vec![scheme; 2],
            selection: vec![vec![SelectionType::Nsga2], vec![SelectionType::Spea2]],
            depth_config: vec![false; 2],
            metrics: MetricMatrix::PerScheme(vec![
                MetricSpec::pair(
                    quality,
                    ComplexityMetric::ComputationTime
                );
                2
            ]),
            runs: 4,
            collect_pareto: true,
            compare_hypervolume: false,
        },
    ))
}

/// Computation-time vs. structural complexity as the second objective.
pub fn complexity_metrics(
    train_path: impl Into<PathBuf>,
    test_path: impl Into<PathBuf>,
    dataset: &str,
    output_root: impl Into<PathBuf>,
    task: TaskType,
) -> Result<SweepPlan, MetricError> {
    let quality = task.default_quality_metric()?;

    Ok(plan_from_axis(
        train_path.into(),
        test_path.into(),
        dataset,
        output_root.into(),
        task,
        quality,
        StudyAxis {
            labels: vec![
                "computation time".to_string(),
                "structural complexity".to_string(),
            ],
            schemes: vec![GeneticSchemeType::SteadyState; 2],
            selection: vec![vec![SelectionType::Spea2]; 2],
            depth_config: vec![false; 2],
            metrics: MetricMatrix::PerScheme(vec![
                MetricSpec::pair(quality, ComplexityMetric::ComputationTime),
                MetricSpec::pair(quality, ComplexityMetric::Structural),
            ]),
            runs: 4,
            collect_pareto: false,
            compare_hypervolume: true,
        },
    ))
}
