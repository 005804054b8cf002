use serde::{Deserialize, Serialize};

/// Per-molecule ensemble metadata, read from the molecule's `conformer.json`.
///
/// Keys the sampling stage writes in addition to these (energies, ranges) are ignored on
/// load; see [`SamplingRecord`] for the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleMetadata {
    pub natoms: usize,
    pub charge: i32,
    /// Number of conformers produced by sampling, before any selection or filtering.
    pub nconf: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EnsembleMetadata {
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.charge == 0
    }
}

/// The complete `conformer.json` record written after a sampling job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingRecord {
    #[serde(flatten)]
    pub metadata: EnsembleMetadata,
    /// Sampling energies of all conformers (kcal/mol, as reported by the sampler).
    #[serde(default)]
    pub energies: Vec<f64>,
    #[serde(default)]
    pub energy_range: f64,
    #[serde(default)]
    pub mean_energy: f64,
}

impl SamplingRecord {
    /// Builds a record, deriving the energy range and mean from `energies`.
    ///
    /// The range is zero for fewer than two energies and the mean is zero for none.
    pub fn from_energies(metadata: EnsembleMetadata, energies: Vec<f64>) -> Self {
        let energy_range = if energies.len() > 1 {
            let max = energies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = energies.iter().copied().fold(f64::INFINITY, f64::min);
            max - min
        } else {
            0.0
        };
        let mean_energy = if energies.is_empty() {
            0.0
        } else {
            energies.iter().sum::<f64>() / energies.len() as f64
        };
        Self {
            metadata,
            energies,
            energy_range,
            mean_energy,
        }
    }
}
