use crate::cli::BenchmarkArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::report;
use confbench::core::models::method::MethodSet;
use confbench::engine::benchmark::BenchmarkReport;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use std::path::Path;
use tracing::info;

pub fn run(
    args: &BenchmarkArgs,
    app: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<BenchmarkReport> {
    let database_file = app.database_file(args.database.as_deref());
    info!(database = %database_file.display(), "Invoking the benchmark workflow...");

    let (database, report) =
        workflows::benchmark::run_from_file(&app.root, &app.layout, &database_file, reporter)?;
    publish(&report, &database.methods, args.csv.as_deref())?;
    Ok(report)
}

/// Prints the report and optionally exports the per-molecule scores.
pub(crate) fn publish(
    report: &BenchmarkReport,
    methods: &MethodSet,
    csv: Option<&Path>,
) -> Result<()> {
    print!("{}", report::render(report, methods));
    if let Some(path) = csv {
        report.write_csv(path)?;
        info!(path = %path.display(), "Per-molecule scores written.");
        println!("Scores written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use crate::commands::collect;
    use crate::commands::fixtures::{app, write_run};
    use crate::error::CliError;
    use confbench::engine::error::EngineError;
    use std::fs;
    use tempfile::tempdir;

    fn benchmark_args(cli: &crate::cli::Cli) -> &BenchmarkArgs {
        match &cli.command {
            Commands::Benchmark(args) => args,
            other => panic!("expected benchmark, got {:?}", other),
        }
    }

    #[test]
    fn benchmarks_a_collected_database_and_exports_csv() {
        let root = tempdir().unwrap();
        write_run(root.path());
        let (_, collect_app) = app(root.path(), &["collect"]);
        collect::run(&collect_app, &ProgressReporter::new()).unwrap();

        let csv = root.path().join("scores.csv");
        let (cli, app) = app(root.path(), &["benchmark", "--csv", csv.to_str().unwrap()]);
        let report = run(benchmark_args(&cli), &app, &ProgressReporter::new()).unwrap();

        assert_eq!(report.molecules_included(), 1);
        assert_eq!(report.data_points, 3);
        let content = fs::read_to_string(&csv).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("molecule,points,rho_a,rho_b,rmsd_a,rmsd_b")
        );
        assert!(lines.next().unwrap().starts_with("5,3,"));
    }

    #[test]
    fn fails_fast_without_a_database() {
        let root = tempdir().unwrap();
        write_run(root.path());
        let (cli, app) = app(root.path(), &["benchmark"]);

        let result = run(benchmark_args(&cli), &app, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::Database { .. }))
        ));
    }
}
