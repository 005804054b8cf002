use super::config::EnsembleLayout;
use super::error::MoleculeError;
use crate::core::io::energy::read_energy_record;
use crate::core::io::listing::read_listing;
use crate::core::io::metadata::read_metadata;
use crate::core::models::ensemble::{ConformerEnergies, ConformerEnsemble};
use crate::core::models::ids::{ConformerIndex, MoleculeId};
use crate::core::models::metadata::EnsembleMetadata;
use crate::core::models::method::Method;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One molecule's raw ensemble: absolute energies in Hartree, in manifest order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMolecule {
    pub id: MoleculeId,
    pub metadata: EnsembleMetadata,
    pub ensemble: ConformerEnsemble,
}

pub fn molecule_dir(root: &Path, id: MoleculeId) -> PathBuf {
    root.join(id.to_string())
}

pub fn conformer_dir(root: &Path, id: MoleculeId, conformer: ConformerIndex) -> PathBuf {
    molecule_dir(root, id).join(conformer.to_string())
}

/// Reads the retained conformers of molecule `id` below `root`.
///
/// All method directories of all conformers are checked before any energy file is opened,
/// so a molecule with a single incomplete conformer fails without partial reads.
pub fn load_molecule(
    root: &Path,
    id: MoleculeId,
    layout: &EnsembleLayout,
) -> Result<LoadedMolecule, MoleculeError> {
    let dir = molecule_dir(root, id);
    let metadata = read_metadata(&dir.join(&layout.metadata_file))?;
    let indices: Vec<ConformerIndex> = read_listing(&dir.join(&layout.index_file))?;
    if indices.is_empty() {
        return Err(MoleculeError::NoConformers);
    }

    for &conformer in &indices {
        for method in Method::ALL {
            let path = dir
                .join(conformer.to_string())
                .join(layout.method_dir(method));
            if !path.is_dir() {
                return Err(MoleculeError::MissingMethodDirectory {
                    conformer,
                    method,
                    path,
                });
            }
        }
    }

    let mut ensemble = ConformerEnsemble::with_capacity(indices.len());
    for &conformer in &indices {
        let conf_dir = dir.join(conformer.to_string());
        let read = |method: Method| {
            read_energy_record(
                &conf_dir
                    .join(layout.method_dir(method))
                    .join(&layout.energy_file),
                layout.energy_record,
            )
        };
        let energies = ConformerEnergies::new(
            read(Method::Reference)?,
            read(Method::CheapA)?,
            read(Method::CheapB)?,
        );
        ensemble.push(conformer, energies);
    }

    debug!(molecule = id, conformers = ensemble.len(), "Ensemble loaded.");
    Ok(LoadedMolecule {
        id,
        metadata,
        ensemble,
    })
}
