//! Best-effort result persistence: tabular rows and JSON snapshots.
//!
//! Both sinks return errors instead of propagating panics; the driver
//! inspects them, logs the failing cell and continues the sweep.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::schema::{PipelineCandidate, ResultRow, RunMetrics};

/// Column names of the tabular output.
pub const RESULT_COLUMNS: [&str; 9] = [
    "exp_number",
    "exp_type",
    "iteration",
    "complexity",
    "t_opt",
    "regular",
    "quality",
    "n_models",
    "n_layers",
];

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode snapshot payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Append-only CSV writer with one header per output path.
#[derive(Debug, Default)]
pub struct CsvResultSink {
    headers_written: HashSet<PathBuf>,
}

impl CsvResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the header row, truncating any previous file at `path`.
    ///
    /// Idempotent per path: repeated calls for the same path are no-ops,
    /// so a path receives its header exactly once per sink lifetime.
    pub fn write_header(&mut self, path: &Path, columns: &[&str]) -> Result<(), PersistError> {
        if self.headers_written.contains(path) {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistError::io(path, e))?;
            }
        }

        let mut file = File::create(path).map_err(|e| PersistError::io(path, e))?;
        writeln!(file, "{}", columns.join(",")).map_err(|e| PersistError::io(path, e))?;

        self.headers_written.insert(path.to_path_buf());
        Ok(())
    }

    /// Append one data row.
    pub fn append_row(&mut self, path: &Path, row: &ResultRow) -> Result<(), PersistError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| PersistError::io(path, e))?;

        writeln!(
            file,
            "{},{},{},{},{},{},{:.4},{},{}",
            row.scheme_index,
            row.scheme_label,
            row.run,
            row.complexity,
            row.time_budget_minutes,
            row.is_regularized,
            row.quality,
            row.node_count,
            row.depth,
        )
        .map_err(|e| PersistError::io(path, e))
    }
}

/// Pretty-JSON snapshot writer rooted at the sweep's output directory.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
    root: PathBuf,
}

impl SnapshotSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serialize `payload` to `path`, creating parent directories on
    /// demand.
    pub fn save<T: Serialize + ?Sized>(&self, path: &Path, payload: &T) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistError::io(path, e))?;
            }
        }
        let json = serde_json::to_string_pretty(payload)?;
        fs::write(path, json).map_err(|e| PersistError::io(path, e))
    }

    /// Best mode: the run's end metrics and produced chains, under the
    /// per-run experiment directory.
    pub fn save_best(
        &self,
        dataset: &str,
        experiment: &str,
        run: usize,
        metrics: &RunMetrics,
        chains: &[PipelineCandidate],
    ) -> Result<(), PersistError> {
        let dir = self
            .root
            .join(dataset)
            .join(format!("{}_experiment", run + 1));
        self.save(&dir.join(format!("{experiment}_best_metric.json")), metrics)?;
        self.save(&dir.join(format!("{experiment}_best_chains.json")), chains)
    }

    /// History mode: the sweep-wide quality and individuals aggregates,
    /// under the dataset directory.
    pub fn save_history<Q: Serialize, I: Serialize>(
        &self,
        dataset: &str,
        experiment: &str,
        quality: &Q,
        individuals: &I,
    ) -> Result<(), PersistError> {
        let dir = self.root.join(dataset);
        self.save(
            &dir.join(format!("{experiment}_history_of_quality.json")),
            quality,
        )?;
        self.save(
            &dir.join(format!("{experiment}_history_of_individuals.json")),
            individuals,
        )
    }

    /// The downsampled Pareto front collection for the whole sweep.
    pub fn save_pareto<T: Serialize>(&self, dataset: &str, fronts: &[T]) -> Result<(), PersistError> {
        self.save(
            &self.root.join(format!("{dataset}_pareto_set_gp.json")),
            fronts,
        )
    }
}
