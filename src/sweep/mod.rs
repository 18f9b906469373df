//! Sweep engine for comparing evolutionary search configurations.
//!
//! This module drives an external pipeline optimizer across a matrix of
//! configurations and normalizes what comes back.
//!
//! # Overview
//!
//! The engine consists of:
//!
//! - **Configuration matrix** (`matrix`): per-cell optimizer configuration
//!   with operator defaults resolved once per sweep
//! - **History extraction** (`extract`): scalar/vector fitness normalized
//!   into flat quality sequences with the task sign convention
//! - **Pareto collection** (`pareto`): terminal-archive snapshots and
//!   cross-run downsampling
//! - **Persistence** (`persist`): append-only tabular rows and JSON
//!   aggregate snapshots, both best-effort
//! - **Driver** (`driver`): the nested time/scheme/run loop
//! - **Optimizer seam** (`optimizer`): the external optimizer trait plus a
//!   deterministic synthetic backend
//! - **Visualization seam** (`viz`): post-sweep comparison hooks
//!
//! # Example
//!
//! ```rust,no_run
//! use evosweep::experiments;
//! use evosweep::schema::TaskType;
//! use evosweep::sweep::{ExperimentDriver, NullVisualizer, SyntheticOptimizer};
//!
//! let plan = experiments::self_config_vs_fixed_params(
//!     "data/scoring_train.csv",
//!     "data/scoring_test.csv",
//!     "scoring",
//!     "results",
//!     TaskType::Classification,
//! )
//! .unwrap();
//!
//! let mut driver = ExperimentDriver::new(plan).unwrap();
//! let mut optimizer = SyntheticOptimizer::seeded(42);
//! let report = driver.run(&mut optimizer, &mut NullVisualizer).unwrap();
//! println!("{} cells completed", report.cells_completed);
//! ```

mod driver;
mod extract;
mod matrix;
mod optimizer;
mod pareto;
mod persist;
mod viz;

pub use driver::{ExperimentDriver, SweepError, SweepReport};
pub use extract::{ExtractError, quality_sequence, run_history};
pub use matrix::ConfigurationMatrixBuilder;
pub use optimizer::{OptimizerError, OptimizerRequest, PipelineOptimizer, SyntheticOptimizer};
pub use pareto::{ParetoError, collect_front, downsample_fronts};
pub use persist::{CsvResultSink, PersistError, RESULT_COLUMNS, SnapshotSink};
pub use viz::{NullVisualizer, SweepVisualizer};
