mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod report;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use confbench::engine::progress::ProgressReporter;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("confbench v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = dispatch(&cli);
    match &command_result {
        Ok(()) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}

fn dispatch(cli: &Cli) -> Result<()> {
    let app = config::build_config(cli)?;

    let progress_handler = if cli.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    match &cli.command {
        Commands::Collect => {
            info!("Dispatching to 'collect' command.");
            commands::collect::run(&app, &reporter).map(drop)
        }
        Commands::Benchmark(args) => {
            info!("Dispatching to 'benchmark' command.");
            commands::benchmark::run(args, &app, &reporter).map(drop)
        }
        Commands::Archive(args) => {
            info!("Dispatching to 'archive' command.");
            commands::archive::run(args, &app, &reporter).map(drop)
        }
        Commands::Evaluate(args) => {
            info!("Dispatching to 'evaluate' command.");
            commands::evaluate::run(args, &app, &reporter)
        }
        Commands::Select(args) => {
            info!("Dispatching to 'select' command.");
            commands::select::run(args, &app, &reporter).map(drop)
        }
        Commands::Sample(args) => {
            info!("Dispatching to 'sample' command.");
            commands::sample::run(args, &app, &reporter).map(drop)
        }
    }
}
