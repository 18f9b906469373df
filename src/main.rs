//! evosweep CLI - Run the self-configuring vs. fixed-parameters sweep.
//!
//! The entry surface is deliberately flag-free: it runs exactly one named
//! sweep over fixed relative dataset paths, with output names derived from
//! the dataset label. Swap the study constructor or the optimizer backend
//! here to run a different comparison.

use std::process;

use evosweep::experiments;
use evosweep::schema::TaskType;
use evosweep::sweep::{ExperimentDriver, NullVisualizer, SyntheticOptimizer};

const TRAIN_PATH: &str = "data/scoring_train.csv";
const TEST_PATH: &str = "data/scoring_test.csv";
const DATASET: &str = "scoring";
const OUTPUT_ROOT: &str = "results";

fn main() {
    env_logger::init();

    let plan = experiments::self_config_vs_fixed_params(
        TRAIN_PATH,
        TEST_PATH,
        DATASET,
        OUTPUT_ROOT,
        TaskType::Classification,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error building sweep plan: {}", e);
        process::exit(1);
    });

    println!("evosweep");
    println!("========");
    println!("Dataset: {} ({} / {})", DATASET, TRAIN_PATH, TEST_PATH);
    println!("Schemes: {}", plan.scheme_count());
    for label in &plan.labels {
        println!("  - {}", label);
    }
    println!("Runs per cell: {}", plan.runs);
    println!(
        "Time budget: {} minute steps up to {} minutes",
        plan.budget.step_minutes, plan.budget.max_minutes
    );
    println!();

    let mut driver = ExperimentDriver::new(plan).unwrap_or_else(|e| {
        eprintln!("Error validating sweep plan: {}", e);
        process::exit(1);
    });

    let mut optimizer = SyntheticOptimizer::seeded(42);
    let mut visualizer = NullVisualizer;

    println!("Running sweep...");
    match driver.run(&mut optimizer, &mut visualizer) {
        Ok(report) => {
            println!();
            println!("Sweep complete:");
            println!("  Cells completed: {}", report.cells_completed);
            println!("  Rows written: {}", report.rows_written);
            println!("  Pareto fronts kept: {}", report.pareto_fronts.len());
            println!("  Persistence failures: {}", report.persistence_failures);
        }
        Err(e) => {
            eprintln!("Sweep aborted: {}", e);
            process::exit(1);
        }
    }
}
