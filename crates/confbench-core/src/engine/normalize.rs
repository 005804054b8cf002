use crate::core::models::database::MoleculeEnergies;
use crate::core::models::ensemble::ConformerEnsemble;
use crate::core::models::metadata::EnsembleMetadata;
use crate::core::models::method::Method;
use crate::core::units::hartree_to_kcal;

/// Converts a cleaned, ascending ensemble into relative energies in kcal/mol.
///
/// Element 0 is the reference minimum. Its index is recorded as the lowest conformer and
/// every other element is stored as `(value - value_0) * HARTREE_TO_KCAL` per method.
/// Returns `None` for an empty ensemble.
pub fn normalize(
    ensemble: &ConformerEnsemble,
    metadata: &EnsembleMetadata,
) -> Option<MoleculeEnergies> {
    let (lowest_conformer, _) = ensemble.get(0)?;

    let relative = |method: Method| -> Vec<f64> {
        let values = ensemble.energies(method);
        values[1..]
            .iter()
            .map(|v| hartree_to_kcal(v - values[0]))
            .collect()
    };

    Some(MoleculeEnergies {
        lowest_conformer,
        conformer_index: ensemble.indices()[1..].to_vec(),
        reference: relative(Method::Reference),
        cheap_a: relative(Method::CheapA),
        cheap_b: relative(Method::CheapB),
        natoms: metadata.natoms,
        charge: metadata.charge,
        nconf: metadata.nconf,
        name: metadata.name.clone(),
    })
}
