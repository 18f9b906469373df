//! evosweep - Parameter-sweep harness for evolutionary pipeline search.
//!
//! This crate drives an external multi-objective evolutionary optimizer
//! across a matrix of search configurations (genetic scheme, selection
//! strategy, depth control, operator sets, single- vs. multi-objective
//! metrics) under increasing computation-time budgets, normalizes the
//! heterogeneous fitness shapes the optimizer returns, and persists
//! per-generation quality histories and terminal Pareto fronts for
//! downstream comparison.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: sweep plans, metric specifications and result types
//! - `sweep`: the driver loop, extraction, Pareto collection, persistence
//!   and the optimizer/visualizer seams
//! - `experiments`: named, ready-to-run sweep configurations
//!
//! # Example
//!
//! ```rust,no_run
//! use evosweep::experiments;
//! use evosweep::schema::TaskType;
//! use evosweep::sweep::{ExperimentDriver, NullVisualizer, SyntheticOptimizer};
//!
//! let plan = experiments::multi_objective_selections(
//!     "data/scoring_train.csv",
//!     "data/scoring_test.csv",
//!     "scoring",
//!     "results",
//!     TaskType::Classification,
//! )
//! .expect("classification has a default quality metric");
//!
//! let mut driver = ExperimentDriver::new(plan).expect("plan is coherent");
//! let mut optimizer = SyntheticOptimizer::seeded(42);
//! let report = driver
//!     .run(&mut optimizer, &mut NullVisualizer)
//!     .expect("sweep completes");
//!
//! println!(
//!     "{} cells, {} rows written",
//!     report.cells_completed, report.rows_written
//! );
//! ```

pub mod experiments;
pub mod schema;
pub mod sweep;

// Re-export commonly used types
pub use schema::{MetricSpec, SweepPlan, TaskType};
pub use sweep::{ExperimentDriver, PipelineOptimizer, SweepReport, SweepVisualizer};
