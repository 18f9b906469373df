//! Post-sweep visualization seam.
//!
//! Chart rendering is an external concern; the driver only hands over the
//! aggregates it accumulated, in sweep order.

use crate::schema::{ArchiveAggregate, HistoryAggregate, ParetoFrontSnapshot};

/// Receives the sweep's aggregates for cross-configuration comparison.
///
/// All methods default to no-ops so implementations can pick the
/// comparisons they render.
pub trait SweepVisualizer {
    /// Quality-over-generations comparison across schemes; called only
    /// for sweeps with more than one run per cell.
    fn compare_history(
        &mut self,
        history: &HistoryAggregate,
        labels: &[String],
        axis_labels: (&str, &str),
        dataset: &str,
    ) {
        let _ = (history, labels, axis_labels, dataset);
    }

    /// Terminal Pareto front comparison, one front per scheme group.
    fn compare_pareto_fronts(
        &mut self,
        fronts: &[ParetoFrontSnapshot],
        labels: &[String],
        objective_names: (&str, &str),
        dataset: &str,
    ) {
        let _ = (fronts, labels, objective_names, dataset);
    }

    /// Hypervolume comparison over the retained archive histories.
    fn compare_hypervolume(
        &mut self,
        archives: &ArchiveAggregate,
        labels: &[String],
        generations: usize,
        dataset: &str,
    ) {
        let _ = (archives, labels, generations, dataset);
    }
}

/// Visualizer that renders nothing; for headless sweeps and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisualizer;

impl SweepVisualizer for NullVisualizer {}
