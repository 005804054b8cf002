use super::config::FilterConfig;
use crate::core::models::ensemble::ConformerEnsemble;
use crate::core::models::method::Method;
use crate::core::units::hartree_to_kcal;

/// Sorts `ensemble` by reference energy and removes near-degenerate neighbours.
///
/// After a stable ascending sort, adjacent pairs are scanned from the bottom. When the
/// reference gap of a pair is below `config.tolerance_kcal` and the ensemble still has more
/// than `config.min_members` conformers, the higher-energy member is removed from all four
/// arrays and the scan restarts. On an exact tie the earlier member goes. Returns the number
/// of removed conformers.
pub fn deduplicate(ensemble: &mut ConformerEnsemble, config: &FilterConfig) -> usize {
    ensemble.sort_by_reference();

    let mut removed = 0;
    while ensemble.len() > config.min_members {
        match find_degenerate(ensemble.energies(Method::Reference), config.tolerance_kcal) {
            Some(position) => {
                ensemble.remove(position);
                removed += 1;
            }
            None => break,
        }
    }
    removed
}

fn find_degenerate(reference: &[f64], tolerance_kcal: f64) -> Option<usize> {
    (1..reference.len()).find_map(|k| {
        let gap = hartree_to_kcal(reference[k] - reference[k - 1]).abs();
        if gap < tolerance_kcal {
            Some(if reference[k] > reference[k - 1] { k } else { k - 1 })
        } else {
            None
        }
    })
}
