use crate::cli::{ArchiveArgs, ArchiveModeArg};
use crate::config::AppConfig;
use crate::error::Result;
use confbench::core::io::database::load_database;
use confbench::core::models::database::EnergyDatabase;
use confbench::engine::error::EngineError;
use confbench::engine::progress::ProgressReporter;
use confbench::workflows;
use confbench::workflows::archive::ArchiveSummary;
use tracing::info;

pub fn run(
    args: &ArchiveArgs,
    app: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<ArchiveSummary> {
    let database_path = app.root.join(app.database_file(args.database.as_deref()));
    info!(database = %database_path.display(), "Loading energy database...");
    let database = load_database(&database_path).map_err(EngineError::from)?;
    build(&database, args.mode, app, reporter)
}

pub(crate) fn build(
    database: &EnergyDatabase,
    mode: ArchiveModeArg,
    app: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<ArchiveSummary> {
    let config = app.archive_config(mode)?;
    let converter = app.converter()?;
    info!(
        archive = %config.archive_dir.display(),
        converter = %converter.program,
        "Invoking the archive workflow..."
    );

    let summary = workflows::archive::run(
        &app.root,
        database,
        &app.layout,
        &config,
        &converter,
        reporter,
    )?;
    println!(
        "Archived {} molecule(s) in {} folder(s) with {} driver line(s) into {}",
        summary.molecules,
        summary.folders,
        summary.script_lines,
        summary.archive_dir.display()
    );
    Ok(summary)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use crate::commands::collect;
    use crate::commands::fixtures::{app, write_run};
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    fn archive_args(cli: &crate::cli::Cli) -> &ArchiveArgs {
        match &cli.command {
            Commands::Archive(args) => args,
            other => panic!("expected archive, got {:?}", other),
        }
    }

    /// `cp <coord> <struc.xyz>` stands in for the geometry converter.
    fn copy_converter_config(root: &std::path::Path) -> String {
        let path = root.join("confbench.toml");
        fs::write(&path, "[archive]\nconverter = \"cp\"\nconverter-args = []\n").unwrap();
        path.display().to_string()
    }

    #[test]
    fn archives_a_collected_database() {
        let root = tempdir().unwrap();
        write_run(root.path());
        let (_, collect_app) = app(root.path(), &["collect"]);
        collect::run(&collect_app, &ProgressReporter::new()).unwrap();

        let config = copy_converter_config(root.path());
        let (cli, app) = app(root.path(), &["archive", "wipe", "-c", &config]);
        let summary = run(archive_args(&cli), &app, &ProgressReporter::new()).unwrap();

        assert_eq!(summary.molecules, 1);
        assert_eq!(summary.folders, 4);
        assert_eq!(summary.script_lines, 3);
        assert_eq!(
            fs::read_to_string(summary.archive_dir.join("RNDCONF_5_1/struc.xyz")).unwrap(),
            "coord\n"
        );
    }

    #[test]
    fn relative_run_directory_converts_every_folder() {
        let root = tempfile::Builder::new()
            .prefix("relative-run")
            .tempdir_in(".")
            .unwrap();
        assert!(root.path().is_relative());
        write_run(root.path());
        let (_, collect_app) = app(root.path(), &["collect"]);
        collect::run(&collect_app, &ProgressReporter::new()).unwrap();

        let config = copy_converter_config(root.path());
        let (cli, app) = app(root.path(), &["archive", "wipe", "-c", &config]);
        let summary = run(archive_args(&cli), &app, &ProgressReporter::new()).unwrap();

        assert_eq!(summary.folders, 4);
        for folder in 1..=4 {
            let converted = root
                .path()
                .join("res_archive")
                .join(format!("RNDCONF_5_{}", folder))
                .join("struc.xyz");
            assert_eq!(fs::read_to_string(&converted).unwrap(), "coord\n");
        }
    }

    #[test]
    fn keep_mode_refuses_an_existing_archive() {
        let root = tempdir().unwrap();
        write_run(root.path());
        let (_, collect_app) = app(root.path(), &["collect"]);
        collect::run(&collect_app, &ProgressReporter::new()).unwrap();
        fs::create_dir_all(root.path().join("res_archive")).unwrap();

        let config = copy_converter_config(root.path());
        let (cli, app) = app(root.path(), &["archive", "keep", "-c", &config]);
        let result = run(archive_args(&cli), &app, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::ArchiveExists { .. }))
        ));
    }
}
