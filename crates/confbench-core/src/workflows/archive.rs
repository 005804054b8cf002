use crate::core::models::database::EnergyDatabase;
use crate::engine::archive::ArchiveBuilder;
use crate::engine::config::{ArchiveConfig, EnsembleLayout};
use crate::engine::convert::GeometryConverter;
use crate::engine::error::EngineError;
use crate::engine::loader::molecule_dir;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub archive_dir: PathBuf,
    pub molecules: usize,
    pub folders: usize,
    pub script_lines: usize,
}

/// Builds the result archive for every molecule of `database`, in molecule id order.
///
/// Any failure aborts the build; a partially written archive is left for inspection.
#[instrument(skip_all, name = "archive_workflow")]
pub fn run<C: GeometryConverter>(
    root: &Path,
    database: &EnergyDatabase,
    layout: &EnsembleLayout,
    config: &ArchiveConfig,
    converter: &C,
    reporter: &ProgressReporter,
) -> Result<ArchiveSummary, EngineError> {
    let first = database.first_molecule().ok_or(EngineError::EmptyDatabase)?;
    let first_dir = molecule_dir(root, first);
    if !first_dir.is_dir() {
        return Err(EngineError::MissingArchiveSource { path: first_dir });
    }

    let builder = ArchiveBuilder::create(root, layout, config, &database.methods, converter)?;
    info!(path = %builder.archive_dir().display(), "Building result archive.");

    reporter.report(Progress::PhaseStart { name: "Archiving" });
    reporter.report(Progress::TaskStart {
        total_steps: database.len() as u64,
    });

    let mut summary = ArchiveSummary {
        archive_dir: builder.archive_dir().to_path_buf(),
        molecules: 0,
        folders: 0,
        script_lines: 0,
    };
    for (id, energies) in database.iter() {
        let archived = builder.add_molecule(id, energies)?;
        summary.molecules += 1;
        summary.folders += archived.folders;
        summary.script_lines += archived.script_lines;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        molecules = summary.molecules,
        folders = summary.folders,
        "Result archive complete."
    );
    Ok(summary)
}
