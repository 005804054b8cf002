/// Conversion factor from Hartree to kcal/mol.
pub const HARTREE_TO_KCAL: f64 = 627.5094740631;

#[inline]
pub fn hartree_to_kcal(hartree: f64) -> f64 {
    hartree * HARTREE_TO_KCAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hartree_converts_to_the_reference_constant() {
        assert_eq!(hartree_to_kcal(1.0), 627.5094740631);
    }

    #[test]
    fn zero_and_negative_gaps_convert_linearly() {
        assert_eq!(hartree_to_kcal(0.0), 0.0);
        assert!((hartree_to_kcal(-0.001) + 0.6275094740631).abs() < 1e-12);
    }
}
