/// Compound identifier of a molecule (the name of its directory in a run root).
pub type MoleculeId = u64;

/// Index of a conformer within its molecule's original sampled ensemble (1-based).
pub type ConformerIndex = u32;
