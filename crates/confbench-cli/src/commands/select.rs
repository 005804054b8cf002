use crate::cli::SelectArgs;
use crate::config::AppConfig;
use crate::error::Result;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use confbench::workflows::select::SelectResult;
use tracing::info;

pub fn run(args: &SelectArgs, app: &AppConfig, reporter: &ProgressReporter) -> Result<SelectResult> {
    let config = app.selection_config(args)?;
    info!(
        min = config.min_conformers,
        max = config.max_conformers,
        seed = config.seed,
        "Invoking the select workflow..."
    );

    let result = workflows::select::run(&app.root, &app.layout, &config, reporter)?;
    let written: usize = result.selected.iter().map(|(_, count)| count).sum();
    println!(
        "Selected {} conformer(s) across {} molecule(s).",
        written,
        result.selected.len()
    );
    for (id, reason) in &result.skipped {
        println!("  skipped {:>10}: {}", id, reason);
    }
    Ok(result)
}
