use crate::core::io::listing::write_listing;
use crate::core::io::metadata::read_metadata;
use crate::core::io::xyz::XyzTrajectory;
use crate::core::models::ids::MoleculeId;
use crate::engine::config::{EnsembleLayout, SelectionConfig};
use crate::engine::error::{EngineError, MoleculeError};
use crate::engine::loader::molecule_dir;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::selection::choose_conformers;
use crate::workflows::collect::read_manifest;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct SelectResult {
    /// Molecule id and the number of conformers written for it.
    pub selected: Vec<(MoleculeId, usize)>,
    pub skipped: Vec<(MoleculeId, MoleculeError)>,
}

/// Extracts a bounded subset of every sampled ensemble into per-conformer XYZ files and
/// writes the retained-conformer index of each molecule.
#[instrument(skip_all, name = "select_workflow")]
pub fn run(
    root: &Path,
    layout: &EnsembleLayout,
    config: &SelectionConfig,
    reporter: &ProgressReporter,
) -> Result<SelectResult, EngineError> {
    let molecules = read_manifest(root, layout)?;
    info!(
        molecules = molecules.len(),
        max = config.max_conformers,
        seed = config.seed,
        "Selecting conformers."
    );

    reporter.report(Progress::PhaseStart { name: "Selecting" });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    let mut result = SelectResult {
        selected: Vec::new(),
        skipped: Vec::new(),
    };
    for &id in &molecules {
        match select_molecule(root, id, layout, config) {
            Ok(count) => result.selected.push((id, count)),
            Err(e) => {
                warn!(molecule = id, error = %e, "Skipping molecule.");
                result.skipped.push((id, e));
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(result)
}

fn select_molecule(
    root: &Path,
    id: MoleculeId,
    layout: &EnsembleLayout,
    config: &SelectionConfig,
) -> Result<usize, MoleculeError> {
    let dir = molecule_dir(root, id);
    let metadata = read_metadata(&dir.join(&layout.metadata_file))?;
    if metadata.nconf < config.min_conformers {
        warn!(
            molecule = id,
            nconf = metadata.nconf,
            min = config.min_conformers,
            "Fewer conformers than requested."
        );
    }
    if metadata.nconf == 0 {
        return Err(MoleculeError::NoConformers);
    }

    let trajectory = XyzTrajectory::open(&dir.join(&config.trajectory_file), metadata.natoms)?;
    let chosen = choose_conformers(metadata.nconf, config.max_conformers, config.seed);
    for &frame in &chosen {
        trajectory.write_frame(frame, &dir.join(format!("{}.xyz", frame)))?;
    }
    write_listing(&dir.join(&layout.index_file), &chosen)?;
    Ok(chosen.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::listing::read_listing;
    use crate::engine::config::SelectionConfigBuilder;
    use std::fs;
    use tempfile::tempdir;

    fn write_sampled(root: &Path, id: MoleculeId, nconf: usize) {
        let dir = molecule_dir(root, id);
        fs::create_dir_all(dir.join("crest")).unwrap();
        fs::write(
            dir.join("conformer.json"),
            format!(r#"{{"natoms": 1, "charge": 0, "nconf": {}}}"#, nconf),
        )
        .unwrap();
        let frames: String = (1..=nconf)
            .map(|i| format!("1\n -{}.0\nC 0.0 0.0 {}.0\n", i, i))
            .collect();
        fs::write(dir.join("crest/crest_conformers.xyz"), frames).unwrap();
    }

    fn config(max: usize) -> SelectionConfig {
        SelectionConfigBuilder::new()
            .min_conformers(2)
            .max_conformers(max)
            .build()
            .unwrap()
    }

    #[test]
    fn small_ensembles_are_taken_whole() {
        let root = tempdir().unwrap();
        write_sampled(root.path(), 4, 3);
        fs::write(root.path().join("compounds.conformers.txt"), "4\n").unwrap();

        let result = run(
            root.path(),
            &EnsembleLayout::default(),
            &config(5),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.selected, vec![(4, 3)]);
        let index: Vec<u32> = read_listing(&root.path().join("4/index.conformers")).unwrap();
        assert_eq!(index, vec![1, 2, 3]);
        assert_eq!(
            fs::read_to_string(root.path().join("4/2.xyz")).unwrap(),
            "1\n -2.0\nC 0.0 0.0 2.0\n"
        );
    }

    #[test]
    fn large_ensembles_are_subsampled_and_broken_ones_skipped() {
        let root = tempdir().unwrap();
        write_sampled(root.path(), 4, 12);
        fs::create_dir_all(root.path().join("5")).unwrap();
        fs::write(root.path().join("compounds.conformers.txt"), "4\n5\n").unwrap();

        let result = run(
            root.path(),
            &EnsembleLayout::default(),
            &config(4),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.selected, vec![(4, 4)]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].0, 5);

        let index: Vec<usize> = read_listing(&root.path().join("4/index.conformers")).unwrap();
        assert_eq!(index.len(), 4);
        for frame in index {
            assert!(root.path().join(format!("4/{}.xyz", frame)).is_file());
        }
    }
}
