use crate::cli::SampleArgs;
use crate::config::AppConfig;
use crate::error::Result;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use confbench::workflows::sample::SamplingOutcome;
use tracing::{info, warn};

pub fn run(
    args: &SampleArgs,
    app: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<SamplingOutcome>> {
    let config = app.sampling_config(args)?;
    info!(
        program = %config.program,
        structure = %config.structure_file,
        "Invoking the sample workflow..."
    );

    let outcomes = workflows::sample::run(&app.root, &app.layout, &config, reporter)?;
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded()).collect();
    println!(
        "Sampled {} of {} molecule(s).",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    for outcome in &failed {
        println!(
            "  failed {:>10}: {}",
            outcome.molecule,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    if !outcomes.is_empty() && failed.len() == outcomes.len() {
        warn!("Every sampling job failed.");
    }
    Ok(outcomes)
}
