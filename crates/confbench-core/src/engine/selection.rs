use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;

/// 1-based conformer numbers to keep from a sampled ensemble of `nconf` members.
///
/// Ensembles no larger than `max` keep every member. Larger ones keep `max` distinct
/// members drawn with an RNG seeded by `seed`, so reruns select the same set. The result is
/// sorted ascending.
pub fn choose_conformers(nconf: usize, max: usize, seed: u64) -> Vec<usize> {
    if nconf <= max {
        return (1..=nconf).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<usize> = sample(&mut rng, nconf, max)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    chosen.sort_unstable();
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn small_ensembles_keep_every_member() {
        assert_eq!(choose_conformers(4, 10, 1995), vec![1, 2, 3, 4]);
        assert_eq!(choose_conformers(10, 10, 1995).len(), 10);
        assert!(choose_conformers(0, 10, 1995).is_empty());
    }

    #[test]
    fn large_ensembles_are_subsampled_without_repeats() {
        let chosen = choose_conformers(200, 15, 1995);
        assert_eq!(chosen.len(), 15);
        assert!(chosen.windows(2).all(|w| w[0] < w[1]));
        assert!(chosen.iter().all(|&c| (1..=200).contains(&c)));
        assert_eq!(chosen.iter().collect::<HashSet<_>>().len(), 15);
    }

    #[test]
    fn selection_is_reproducible_per_seed() {
        assert_eq!(choose_conformers(50, 5, 7), choose_conformers(50, 5, 7));
    }
}
