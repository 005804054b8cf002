use clap::{Args, Parser, Subcommand, ValueEnum};
use confbench::engine::config::ArchiveMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "confbench - Collects conformer energies from a screening run, removes degenerate conformers, and benchmarks cheap methods against a reference method.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Run directory containing the manifest and one folder per molecule
    #[arg(short = 'C', long, global = true, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S filter.tolerance-kcal=0.05
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect, filter and normalize conformer energies into the energy database.
    Collect,
    /// Benchmark the cheap methods against the reference using an existing database.
    Benchmark(BenchmarkArgs),
    /// Build the result archive from an existing database.
    Archive(ArchiveArgs),
    /// Run the full pipeline: collect, benchmark and archive.
    Evaluate(EvaluateArgs),
    /// Extract a bounded random subset of every sampled conformer ensemble.
    Select(SelectArgs),
    /// Run the conformer sampler for every molecule of the manifest.
    Sample(SampleArgs),
}

/// How an existing archive directory is treated.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveModeArg {
    /// Delete an existing archive before building
    Wipe,
    /// Refuse to touch an existing archive
    Keep,
}

impl From<ArchiveModeArg> for ArchiveMode {
    fn from(mode: ArchiveModeArg) -> Self {
        match mode {
            ArchiveModeArg::Wipe => ArchiveMode::Wipe,
            ArchiveModeArg::Keep => ArchiveMode::Keep,
        }
    }
}

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Energy database to benchmark, relative to the run directory.
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Also write the per-molecule scores as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    #[arg(value_enum)]
    pub mode: ArchiveModeArg,

    /// Energy database to archive, relative to the run directory.
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[arg(value_enum)]
    pub mode: ArchiveModeArg,

    /// Also write the per-molecule scores as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Warn about ensembles with fewer conformers than this.
    #[arg(long, value_name = "INT")]
    pub min: Option<usize>,

    /// Maximum number of conformers kept per molecule.
    #[arg(long, value_name = "INT")]
    pub max: Option<usize>,

    /// Seed for the random subset choice.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Total number of cores shared by the sampling jobs. Defaults to the detected count.
    #[arg(long, value_name = "NUM")]
    pub cores: Option<usize>,

    /// Structure file inside each molecule folder.
    #[arg(long, value_name = "FILE")]
    pub structure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_options_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from([
            "confbench",
            "benchmark",
            "-C",
            "/runs/a",
            "--csv",
            "scores.csv",
            "-vv",
        ]);
        assert_eq!(cli.root, PathBuf::from("/runs/a"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Benchmark(args) => {
                assert_eq!(args.csv, Some(PathBuf::from("scores.csv")));
                assert!(args.database.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn archive_mode_is_a_required_positional() {
        assert!(Cli::try_parse_from(["confbench", "archive"]).is_err());
        let cli = Cli::try_parse_from(["confbench", "evaluate", "keep"]).unwrap();
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(ArchiveMode::from(args.mode), ArchiveMode::Keep);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["confbench", "collect", "-q", "-v"]).is_err());
    }

    #[test]
    fn set_values_accumulate() {
        let cli = Cli::parse_from([
            "confbench",
            "collect",
            "-S",
            "filter.min-members=4",
            "-S",
            "collect.include-charged=true",
        ]);
        assert_eq!(cli.set_values.len(), 2);
        assert_eq!(cli.root, PathBuf::from("."));
    }
}
