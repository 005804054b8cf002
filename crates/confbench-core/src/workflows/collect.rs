use crate::core::io::database::save_database;
use crate::core::io::listing::read_listing;
use crate::core::models::database::{EnergyDatabase, MoleculeEnergies};
use crate::core::models::ids::MoleculeId;
use crate::engine::config::{CollectConfig, EnsembleLayout};
use crate::engine::error::{EngineError, MoleculeError};
use crate::engine::filter::deduplicate;
use crate::engine::loader::load_molecule;
use crate::engine::normalize::normalize;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct CollectResult {
    pub database: EnergyDatabase,
    pub database_path: PathBuf,
    pub skipped: Vec<(MoleculeId, MoleculeError)>,
    pub duplicates_removed: usize,
}

/// Resolves the run manifest below `root`, failing if it does not exist.
pub fn require_manifest(root: &Path, layout: &EnsembleLayout) -> Result<PathBuf, EngineError> {
    let path = root.join(&layout.manifest_file);
    if !path.is_file() {
        return Err(EngineError::MissingManifest { path });
    }
    Ok(path)
}

/// Reads the molecule ids listed in the run manifest.
pub fn read_manifest(root: &Path, layout: &EnsembleLayout) -> Result<Vec<MoleculeId>, EngineError> {
    let path = require_manifest(root, layout)?;
    Ok(read_listing(&path)?)
}

#[instrument(skip_all, name = "collect_workflow")]
pub fn run(
    root: &Path,
    config: &CollectConfig,
    reporter: &ProgressReporter,
) -> Result<CollectResult, EngineError> {
    let molecules = read_manifest(root, &config.layout)?;
    info!(molecules = molecules.len(), "Collecting conformer energies.");

    reporter.report(Progress::PhaseStart {
        name: "Collecting",
    });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    let mut database = EnergyDatabase::new(config.methods.clone());
    let mut skipped = Vec::new();
    let mut duplicates_removed = 0;
    for &id in &molecules {
        match collect_molecule(root, id, config) {
            Ok((energies, removed)) => {
                duplicates_removed += removed;
                database.insert(id, energies);
            }
            Err(e) => {
                warn!(molecule = id, error = %e, "Skipping molecule.");
                skipped.push((id, e));
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let database_path = root.join(&config.database_file);
    save_database(&database, &database_path)?;
    info!(
        collected = database.len(),
        skipped = skipped.len(),
        duplicates_removed,
        path = %database_path.display(),
        "Energy database written."
    );

    Ok(CollectResult {
        database,
        database_path,
        skipped,
        duplicates_removed,
    })
}

/// Loads, cleans and normalizes one molecule. Returns the entry and the number of removed
/// duplicates.
pub fn collect_molecule(
    root: &Path,
    id: MoleculeId,
    config: &CollectConfig,
) -> Result<(MoleculeEnergies, usize), MoleculeError> {
    let mut loaded = load_molecule(root, id, &config.layout)?;
    if !config.include_charged && !loaded.metadata.is_neutral() {
        return Err(MoleculeError::ChargedSpecies {
            charge: loaded.metadata.charge,
        });
    }

    let removed = deduplicate(&mut loaded.ensemble, &config.filter);
    if removed > 0 {
        debug!(molecule = id, removed, "Removed degenerate conformers.");
    }
    let energies =
        normalize(&loaded.ensemble, &loaded.metadata).ok_or(MoleculeError::NoConformers)?;
    Ok((energies, removed))
}
