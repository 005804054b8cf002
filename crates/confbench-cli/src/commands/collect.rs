use crate::config::AppConfig;
use crate::error::Result;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use confbench::workflows::collect::CollectResult;
use tracing::info;

pub fn run(app: &AppConfig, reporter: &ProgressReporter) -> Result<CollectResult> {
    let config = app.collect_config()?;
    info!(
        root = %app.root.display(),
        tolerance_kcal = config.filter.tolerance_kcal,
        min_members = config.filter.min_members,
        "Invoking the collect workflow..."
    );

    let result = workflows::collect::run(&app.root, &config, reporter)?;
    print_summary(&result);
    Ok(result)
}

pub(crate) fn print_summary(result: &CollectResult) {
    println!(
        "Collected {} molecule(s) into {} ({} degenerate conformer(s) removed).",
        result.database.len(),
        result.database_path.display(),
        result.duplicates_removed
    );
    if !result.skipped.is_empty() {
        println!("Skipped {} molecule(s):", result.skipped.len());
        for (id, reason) in &result.skipped {
            println!("  {:>10}: {}", id, reason);
        }
    }
}
