//! Schema module - Sweep plans, metric specifications and result types.

mod config;
mod metrics;
mod result;

pub use config::*;
pub use metrics::*;
pub use result::*;
