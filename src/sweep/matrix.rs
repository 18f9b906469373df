//! Per-cell configuration assembly for the sweep matrix.

use std::sync::Arc;

use crate::schema::{OperatorSet, SchemeConfig, SweepPlan};

/// Derives the concrete optimizer configuration for each sweep cell.
///
/// The crossover/mutation fallback is resolved exactly once, when the
/// builder is constructed: a caller-supplied operator set wins, otherwise
/// the fixed defaults are used. Every cell of the sweep then shares that
/// one `Arc` - the fallback is never re-derived mid-sweep.
pub struct ConfigurationMatrixBuilder<'a> {
    plan: &'a SweepPlan,
    operators: Arc<OperatorSet>,
}

impl<'a> ConfigurationMatrixBuilder<'a> {
    /// Resolve the operator fallback and bind the builder to a validated
    /// plan.
    pub fn new(plan: &'a SweepPlan) -> Self {
        let operators = Arc::new(plan.operators.clone().unwrap_or_default());
        Self { plan, operators }
    }

    /// The operator set every produced configuration shares.
    pub fn operator_set(&self) -> &Arc<OperatorSet> {
        &self.operators
    }

    /// Configuration for one scheme index.
    ///
    /// The index must be within the plan's validated scheme count.
    pub fn cell_config(&self, scheme_index: usize) -> SchemeConfig {
        SchemeConfig {
            genetic_scheme: self.plan.schemes[scheme_index],
            selection: self.plan.selection[scheme_index].clone(),
            operators: Arc::clone(&self.operators),
            regularization: self.plan.regularization,
            auto_depth_configuration: self.plan.depth_config[scheme_index],
            max_depth: self.plan.max_depths[scheme_index],
            start_depth: self.plan.start_depths[scheme_index],
            population_size: self.plan.population_sizes[scheme_index],
            metric: self.plan.metrics.for_scheme(scheme_index).clone(),
        }
    }
}
