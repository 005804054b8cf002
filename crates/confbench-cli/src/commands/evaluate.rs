use super::{archive, benchmark, collect};
use crate::cli::EvaluateArgs;
use crate::config::AppConfig;
use crate::error::Result;
use confbench::engine::error::EngineError;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use confbench::workflows::collect::require_manifest;
use tracing::{info, warn};

/// Full pipeline: collect, benchmark, then archive the collected database.
pub fn run(args: &EvaluateArgs, app: &AppConfig, reporter: &ProgressReporter) -> Result<()> {
    let manifest = require_manifest(&app.root, &app.layout)?;
    info!(manifest = %manifest.display(), "Starting full evaluation.");

    let collected = collect::run(app, reporter)?;
    if collected.database.is_empty() {
        warn!("No molecule survived collection; nothing to benchmark or archive.");
        return Err(EngineError::EmptyDatabase.into());
    }

    let report = workflows::benchmark::run(&collected.database, reporter);
    benchmark::publish(&report, &collected.database.methods, args.csv.as_deref())?;

    archive::build(&collected.database, args.mode, app, reporter)?;
    Ok(())
}
