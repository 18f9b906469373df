//! The sweep driver: time budget x scheme x run enumeration.

use log::{debug, info, warn};

use crate::schema::{
    ArchiveAggregate, ComplexityMetric, HistoryAggregate, IndividualsAggregate, MetricSpec,
    ParetoFrontSnapshot, PlanError, ResultRow, RunMetrics, RunResult, SweepPlan, TaskType,
};

use super::extract::{self, ExtractError};
use super::matrix::ConfigurationMatrixBuilder;
use super::optimizer::{OptimizerError, OptimizerRequest, PipelineOptimizer};
use super::pareto::{self, ParetoError};
use super::persist::{CsvResultSink, RESULT_COLUMNS, SnapshotSink};
use super::viz::SweepVisualizer;

/// Errors that abort a sweep.
///
/// Persistence failures are deliberately absent: they are logged at the
/// failing cell and the sweep continues.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Pareto(#[from] ParetoError),
    #[error(
        "scheme {scheme_index} run {run}: result shape {actual} does not match the {expected} metric spec"
    )]
    MetricShapeMismatch {
        scheme_index: usize,
        run: usize,
        expected: &'static str,
        actual: &'static str,
    },
    #[error(
        "scheme {scheme_index} run {run}: {values} metric values for {chains} produced chains"
    )]
    MetricLengthMismatch {
        scheme_index: usize,
        run: usize,
        values: usize,
        chains: usize,
    },
}

/// Aggregates accumulated over one completed sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub quality_history: HistoryAggregate,
    pub individuals_history: IndividualsAggregate,
    /// Downsampled Pareto fronts; empty unless collection was enabled.
    pub pareto_fronts: Vec<ParetoFrontSnapshot>,
    pub cells_completed: usize,
    pub rows_written: usize,
    pub persistence_failures: usize,
}

/// Runs a sweep plan against an optimizer backend.
///
/// Cells are enumerated time-budget-major, then scheme-major, then
/// run-minor, and all accumulators preserve that order. The Pareto
/// downsampling step depends on this contract; callers must not assume
/// any other interleaving.
pub struct ExperimentDriver {
    plan: SweepPlan,
    csv: CsvResultSink,
    snapshots: SnapshotSink,
    housekeeping: Option<Box<dyn FnMut()>>,
}

impl ExperimentDriver {
    /// Validate the plan and bind the output sinks.
    pub fn new(plan: SweepPlan) -> Result<Self, PlanError> {
        plan.validate()?;
        let snapshots = SnapshotSink::new(plan.output_root.clone());
        Ok(Self {
            plan,
            csv: CsvResultSink::new(),
            snapshots,
            housekeeping: None,
        })
    }

    /// Install a hook invoked before every optimizer call.
    ///
    /// Advisory memory housekeeping for sweeps that run hundreds of
    /// cells; the driver makes no correctness assumption about it.
    pub fn with_housekeeping(mut self, hook: impl FnMut() + 'static) -> Self {
        self.housekeeping = Some(Box::new(hook));
        self
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    /// Execute the full sweep.
    ///
    /// Optimizer failures and malformed result shapes abort immediately;
    /// persistence failures are logged with the failing cell's dataset,
    /// scheme index, run index and time budget, then skipped.
    pub fn run<O, V>(
        &mut self,
        optimizer: &mut O,
        visualizer: &mut V,
    ) -> Result<SweepReport, SweepError>
    where
        O: PipelineOptimizer + ?Sized,
        V: SweepVisualizer + ?Sized,
    {
        let plan = &self.plan;
        let builder = ConfigurationMatrixBuilder::new(plan);
        let scheme_count = plan.scheme_count();

        let mut quality_history = HistoryAggregate::new(scheme_count);
        let mut individuals_history = IndividualsAggregate::new(scheme_count);
        let mut archive_aggregate = ArchiveAggregate::new(scheme_count);
        let mut collected_fronts: Vec<ParetoFrontSnapshot> = Vec::new();

        let mut cells_completed = 0usize;
        let mut rows_written = 0usize;
        let mut persistence_failures = 0usize;

        let table_path = plan
            .output_root
            .join(format!("{}_multiobj_exp_best.csv", plan.dataset));
        if let Err(err) = self.csv.write_header(&table_path, &RESULT_COLUMNS) {
            persistence_failures += 1;
            warn!("dataset {}: table header not written: {err}", plan.dataset);
        }

        info!(
            "starting sweep over {} schemes, {} runs each, budget {}..={} minutes",
            scheme_count, plan.runs, plan.budget.step_minutes, plan.budget.max_minutes
        );

        let mut time_amount = plan.budget.step_minutes;
        while time_amount <= plan.budget.max_minutes {
            for scheme_index in 0..scheme_count {
                for run in 0..plan.runs {
                    if let Some(hook) = self.housekeeping.as_mut() {
                        hook();
                    }

                    let config = builder.cell_config(scheme_index);
                    let metric = config.metric.clone();
                    let request = OptimizerRequest {
                        train_path: plan.train_path.clone(),
                        test_path: plan.test_path.clone(),
                        time_budget_minutes: time_amount,
                        population_size: config.population_size,
                        generations: plan.generations,
                        max_depth: config.max_depth,
                        start_depth: config.start_depth,
                        metric: metric.clone(),
                        task: plan.task,
                        config,
                    };

                    debug!(
                        "dataset {} scheme {scheme_index} run {run}: invoking optimizer, {time_amount} minute budget",
                        plan.dataset
                    );
                    let result = optimizer.run(&request)?;
                    check_result_shape(&metric, &result, scheme_index, run)?;

                    let label = &plan.labels[scheme_index];

                    let best_name =
                        format!("{}_{}_run_number_{}", plan.dataset, label, run + 1);
                    if let Err(err) = self.snapshots.save_best(
                        &plan.dataset,
                        &best_name,
                        run,
                        &result.metrics,
                        &result.chains,
                    ) {
                        persistence_failures += 1;
                        warn!(
                            "dataset {} scheme {scheme_index} run {run} t_opt {time_amount}: best snapshot not saved: {err}",
                            plan.dataset
                        );
                    }

                    if plan.collect_pareto {
                        collected_fronts.push(pareto::collect_front(&result.state, plan.task)?);
                    }

                    let history =
                        extract::run_history(&result.state, plan.task, metric.is_multi_objective())?;
                    quality_history.push(scheme_index, history);
                    individuals_history.push(
                        scheme_index,
                        result
                            .state
                            .individuals
                            .iter()
                            .map(|population| {
                                population
                                    .iter()
                                    .map(|individual| individual.fitness.clone())
                                    .collect()
                            })
                            .collect(),
                    );
                    if plan.compare_hypervolume {
                        archive_aggregate.push(scheme_index, result.state.archive_history.clone());
                    }

                    let (qualities, complexities) = match &result.metrics {
                        RunMetrics::Single(quality) => (quality.as_slice(), None),
                        RunMetrics::Paired {
                            quality,
                            complexity,
                        } => (quality.as_slice(), Some(complexity.as_slice())),
                    };
                    for (i, chain) in result.chains.iter().enumerate() {
                        let complexity = match complexities {
                            Some(values) => values[i],
                            None => ComplexityMetric::ComputationTime.evaluate(chain),
                        };
                        let row = ResultRow {
                            scheme_index,
                            scheme_label: label.clone(),
                            run,
                            complexity,
                            time_budget_minutes: time_amount,
                            is_regularized: plan.regularization.is_regularized(),
                            quality: ResultRow::round_quality(qualities[i]),
                            node_count: chain.node_count,
                            depth: chain.depth,
                        };
                        match self.csv.append_row(&table_path, &row) {
                            Ok(()) => rows_written += 1,
                            Err(err) => {
                                persistence_failures += 1;
                                warn!(
                                    "dataset {} scheme {scheme_index} run {run} t_opt {time_amount}: row not written: {err}",
                                    plan.dataset
                                );
                            }
                        }
                    }

                    let history_name = format!("{}_{}_run_number_{}", plan.dataset, label, run);
                    if let Err(err) = self.snapshots.save_history(
                        &plan.dataset,
                        &history_name,
                        &quality_history,
                        &individuals_history,
                    ) {
                        persistence_failures += 1;
                        warn!(
                            "dataset {} scheme {scheme_index} run {run} t_opt {time_amount}: history snapshot not saved: {err}",
                            plan.dataset
                        );
                    }

                    cells_completed += 1;
                }
            }
            time_amount += plan.budget.step_minutes;
        }

        if plan.runs > 1 {
            let quality_label = match plan.task {
                TaskType::Classification => "ROC-AUC",
                _ => "RMSE",
            };
            let best_label = format!("Best {quality_label}");
            visualizer.compare_history(
                &quality_history,
                &plan.labels,
                ("Generation, #", best_label.as_str()),
                &plan.dataset,
            );
        }

        let pareto_fronts = if plan.collect_pareto {
            let fronts = pareto::downsample_fronts(collected_fronts, plan.runs);
            visualizer.compare_pareto_fronts(
                &fronts,
                &plan.labels,
                (&plan.objective_names.0, &plan.objective_names.1),
                &plan.dataset,
            );
            if let Err(err) = self.snapshots.save_pareto(&plan.dataset, &fronts) {
                persistence_failures += 1;
                warn!(
                    "dataset {}: pareto collection not saved: {err}",
                    plan.dataset
                );
            }
            fronts
        } else {
            Vec::new()
        };

        if plan.compare_hypervolume {
            visualizer.compare_hypervolume(
                &archive_aggregate,
                &plan.labels,
                plan.generations,
                &plan.dataset,
            );
        }

        info!(
            "sweep finished: {cells_completed} cells, {rows_written} rows, {persistence_failures} persistence failures"
        );

        Ok(SweepReport {
            quality_history,
            individuals_history,
            pareto_fronts,
            cells_completed,
            rows_written,
            persistence_failures,
        })
    }
}

/// Check the optimizer result against the cell's metric spec.
fn check_result_shape(
    metric: &MetricSpec,
    result: &RunResult,
    scheme_index: usize,
    run: usize,
) -> Result<(), SweepError> {
    let chains = result.chains.len();
    match (metric, &result.metrics) {
        (MetricSpec::Scalar { .. }, RunMetrics::Single(quality)) => {
            if quality.len() != chains {
                return Err(SweepError::MetricLengthMismatch {
                    scheme_index,
                    run,
                    values: quality.len(),
                    chains,
                });
            }
            Ok(())
        }
        (
            MetricSpec::Pair { .. },
            RunMetrics::Paired {
                quality,
                complexity,
            },
        ) => {
            if quality.len() != chains || complexity.len() != chains {
                return Err(SweepError::MetricLengthMismatch {
                    scheme_index,
                    run,
                    values: quality.len().max(complexity.len()),
                    chains,
                });
            }
            Ok(())
        }
        (MetricSpec::Scalar { .. }, RunMetrics::Paired { .. }) => {
            Err(SweepError::MetricShapeMismatch {
                scheme_index,
                run,
                expected: "scalar",
                actual: "paired",
            })
        }
        (MetricSpec::Pair { .. }, RunMetrics::Single(_)) => Err(SweepError::MetricShapeMismatch {
            scheme_index,
            run,
            expected: "paired",
            actual: "scalar",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        GeneticSchemeType, Individual, MetricMatrix, OperatorSet, OptimizerState,
        PipelineCandidate, QualityMetric, RegularizationType, SelectionType, TimeBudget,
    };
    use crate::sweep::viz::NullVisualizer;
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Optimizer that returns canned multi-objective results and records
    /// every request it sees.
    struct RecordingOptimizer {
        requests: Vec<(u64, usize)>,
        multi_objective: bool,
    }

    impl RecordingOptimizer {
        fn new(multi_objective: bool) -> Self {
            Self {
                requests: Vec::new(),
                multi_objective,
            }
        }

        fn canned_result(&self, multi_objective: bool) -> RunResult {
            let individual = |quality: f64| {
                if multi_objective {
                    Individual::vector(vec![-quality, 2.0])
                } else {
                    Individual::scalar(-quality)
                }
            };
            let chains = vec![
                PipelineCandidate {
                    node_count: 3,
                    depth: 2,
                    fit_seconds: 4.0,
                },
                PipelineCandidate {
                    node_count: 5,
                    depth: 3,
                    fit_seconds: 9.0,
                },
            ];
            let metrics = if multi_objective {
                RunMetrics::Paired {
                    quality: vec![0.81, 0.79],
                    complexity: vec![2.0, 3.0],
                }
            } else {
                RunMetrics::Single(vec![0.81, 0.79])
            };
            RunResult {
                metrics,
                chains,
                state: OptimizerState {
                    archive_history: vec![
                        vec![individual(0.7)],
                        vec![individual(0.8), individual(0.75)],
                    ],
                    individuals: vec![
                        vec![individual(0.6), individual(0.65)],
                        vec![individual(0.7), individual(0.72)],
                    ],
                },
            }
        }
    }

    impl PipelineOptimizer for RecordingOptimizer {
        fn run(&mut self, request: &OptimizerRequest) -> Result<RunResult, OptimizerError> {
            self.requests
                .push((request.time_budget_minutes, request.population_size));
            Ok(self.canned_result(self.multi_objective))
        }
    }

    /// Visualizer that records which comparisons were requested.
    #[derive(Default)]
    struct RecordingVisualizer {
        history_calls: usize,
        pareto_fronts_seen: usize,
        hypervolume_calls: usize,
    }

    impl SweepVisualizer for RecordingVisualizer {
        fn compare_history(
            &mut self,
            _history: &HistoryAggregate,
            _labels: &[String],
            _axis_labels: (&str, &str),
            _dataset: &str,
        ) {
            self.history_calls += 1;
        }

        fn compare_pareto_fronts(
            &mut self,
            fronts: &[ParetoFrontSnapshot],
            _labels: &[String],
            _objective_names: (&str, &str),
            _dataset: &str,
        ) {
            self.pareto_fronts_seen = fronts.len();
        }

        fn compare_hypervolume(
            &mut self,
            _archives: &ArchiveAggregate,
            _labels: &[String],
            _generations: usize,
            _dataset: &str,
        ) {
            self.hypervolume_calls += 1;
        }
    }

    fn plan_in(dir: &std::path::Path, schemes: usize, runs: usize, budget: TimeBudget) -> SweepPlan {
        SweepPlan {
            dataset: "scoring".to_string(),
            train_path: PathBuf::from("train.csv"),
            test_path: PathBuf::from("test.csv"),
            output_root: dir.to_path_buf(),
            task: TaskType::Classification,
            labels: (0..schemes).map(|i| format!("scheme_{i}")).collect(),
            schemes: vec![GeneticSchemeType::SteadyState; schemes],
            selection: vec![vec![SelectionType::Spea2]; schemes],
            depth_config: vec![false; schemes],
            max_depths: vec![3; schemes],
            start_depths: vec![2; schemes],
            population_sizes: vec![20; schemes],
            metrics: MetricMatrix::Uniform(MetricSpec::pair(
                QualityMetric::RocAuc,
                crate::schema::ComplexityMetric::ComputationTime,
            )),
            operators: None,
            regularization: RegularizationType::Decremental,
            generations: 2,
            runs,
            budget,
            collect_pareto: true,
            compare_hypervolume: false,
            objective_names: ("ROC-AUC metric".to_string(), "Computation time".to_string()),
        }
    }

    #[test]
    fn test_budget_enumeration_order() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            2,
            1,
            TimeBudget {
                step_minutes: 200,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        // floor(800 / 200) = 4 outer iterations, 2 schemes each.
        let budgets: Vec<u64> = optimizer.requests.iter().map(|(t, _)| *t).collect();
        assert_eq!(budgets, vec![200, 200, 400, 400, 600, 600, 800, 800]);
        assert_eq!(report.cells_completed, 8);
    }

    #[test]
    fn test_single_iteration_when_step_equals_budget() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            1,
            1,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        assert_eq!(optimizer.requests, vec![(800, 20)]);
        assert_eq!(report.cells_completed, 1);
    }

    #[test]
    fn test_rows_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            2,
            2,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        // 4 cells x 2 chains per result.
        assert_eq!(report.rows_written, 8);
        assert_eq!(report.persistence_failures, 0);

        let content =
            fs::read_to_string(dir.path().join("scoring_multiobj_exp_best.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], RESULT_COLUMNS.join(","));
        assert_eq!(
            content.matches(RESULT_COLUMNS[0]).count(),
            1,
            "header must appear exactly once"
        );
    }

    #[test]
    fn test_pareto_downsampled_through_driver() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            3,
            4,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut viz = RecordingVisualizer::default();
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut viz).unwrap();

        // 12 snapshots recorded, every 4th kept.
        assert_eq!(report.pareto_fronts.len(), 3);
        assert_eq!(viz.pareto_fronts_seen, 3);
        // runs > 1 triggers the history comparison.
        assert_eq!(viz.history_calls, 1);
        assert_eq!(viz.hypervolume_calls, 0);
    }

    #[test]
    fn test_history_aggregate_shape() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            2,
            2,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        assert_eq!(report.quality_history.scheme_count(), 2);
        let runs = report.quality_history.scheme(0);
        assert_eq!(runs.len(), 2);
        // 2 generations; population of 2 plus archived set per generation.
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[0][0].len(), 3);
        assert_eq!(runs[0][1].len(), 4);
        // Multi-objective classification: stored values negated back.
        assert_eq!(runs[0][0], vec![0.6, 0.65, 0.7]);
    }

    #[test]
    fn test_housekeeping_hook_runs_per_cell() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            2,
            3,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let count = Rc::new(Cell::new(0usize));
        let seen = Rc::clone(&count);
        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan)
            .unwrap()
            .with_housekeeping(move || seen.set(seen.get() + 1));
        driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        assert_eq!(count.get(), 6);
    }

    #[test]
    fn test_shape_mismatch_aborts() {
        let dir = tempfile::tempdir().unwrap();
        // Pair spec, but the optimizer reports scalar metrics.
        let plan = plan_in(
            dir.path(),
            1,
            1,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(false);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let err = driver
            .run(&mut optimizer, &mut NullVisualizer)
            .unwrap_err();
        assert!(matches!(
            err,
            SweepError::MetricShapeMismatch {
                expected: "paired",
                actual: "scalar",
                ..
            }
        ));
    }

    #[test]
    fn test_persistence_failures_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        // Output root is a regular file; every sink call fails.
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, b"occupied").unwrap();

        let plan = plan_in(
            &blocked,
            1,
            1,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        let mut optimizer = RecordingOptimizer::new(true);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        assert_eq!(report.cells_completed, 1);
        assert!(report.persistence_failures > 0);
        assert_eq!(report.rows_written, 0);
    }

    #[test]
    fn test_on_demand_complexity_for_scalar_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan_in(
            dir.path(),
            1,
            1,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );
        plan.metrics =
            MetricMatrix::Uniform(MetricSpec::scalar(QualityMetric::RocAuc));
        plan.collect_pareto = false;

        let mut optimizer = RecordingOptimizer::new(false);
        let mut driver = ExperimentDriver::new(plan).unwrap();
        driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        let content =
            fs::read_to_string(dir.path().join("scoring_multiobj_exp_best.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // Complexity column holds each chain's fit time.
        assert_eq!(lines[1].split(',').nth(3).unwrap(), "4");
        assert_eq!(lines[2].split(',').nth(3).unwrap(), "9");
    }

    #[test]
    fn test_operator_fallback_shared_across_cells() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(
            dir.path(),
            3,
            1,
            TimeBudget {
                step_minutes: 800,
                max_minutes: 800,
            },
        );

        struct OperatorCapture {
            inner: RecordingOptimizer,
            sets: Vec<std::sync::Arc<OperatorSet>>,
        }
        impl PipelineOptimizer for OperatorCapture {
            fn run(&mut self, request: &OptimizerRequest) -> Result<RunResult, OptimizerError> {
                self.sets.push(std::sync::Arc::clone(&request.config.operators));
                self.inner.run(request)
            }
        }

        let mut optimizer = OperatorCapture {
            inner: RecordingOptimizer::new(true),
            sets: Vec::new(),
        };
        let mut driver = ExperimentDriver::new(plan).unwrap();
        driver.run(&mut optimizer, &mut NullVisualizer).unwrap();

        assert_eq!(optimizer.sets.len(), 3);
        assert!(std::sync::Arc::ptr_eq(&optimizer.sets[0], &optimizer.sets[2]));
        assert_eq!(*optimizer.sets[0], OperatorSet::default());
    }
}
