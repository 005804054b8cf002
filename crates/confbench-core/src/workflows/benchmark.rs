use crate::core::io::database::load_database;
use crate::core::models::database::EnergyDatabase;
use crate::engine::benchmark::{self, BenchmarkReport};
use crate::engine::config::EnsembleLayout;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::collect::require_manifest;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Benchmarks an in-memory database.
#[instrument(skip_all, name = "benchmark_workflow")]
pub fn run(database: &EnergyDatabase, reporter: &ProgressReporter) -> BenchmarkReport {
    reporter.report(Progress::PhaseStart {
        name: "Benchmarking",
    });
    let report = benchmark::evaluate(database);
    for (molecule, reason) in &report.skipped {
        warn!(molecule, %reason, "Molecule excluded from benchmark.");
    }
    info!(
        included = report.molecules_included(),
        total = report.molecules_total,
        data_points = report.data_points,
        "Benchmark finished."
    );
    reporter.report(Progress::PhaseFinish);
    report
}

/// Benchmark-only mode: requires the run manifest and loads a previously persisted database.
pub fn run_from_file(
    root: &Path,
    layout: &EnsembleLayout,
    database_path: &Path,
    reporter: &ProgressReporter,
) -> Result<(EnergyDatabase, BenchmarkReport), EngineError> {
    require_manifest(root, layout)?;
    let database = load_database(&root.join(database_path))?;
    let report = run(&database, reporter);
    Ok((database, report))
}
