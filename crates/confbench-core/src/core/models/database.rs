use super::ids::{ConformerIndex, MoleculeId};
use super::metadata::EnsembleMetadata;
use super::method::{Method, MethodSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative energies of one molecule's cleaned ensemble, in kcal/mol.
///
/// The minimum conformer is stored only by index: its relative energy is zero for every
/// method by construction. `conformer_index` and the three energy vectors are aligned and
/// ordered by ascending reference energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeEnergies {
    #[serde(rename = "conformer_lowest")]
    pub lowest_conformer: ConformerIndex,
    pub conformer_index: Vec<ConformerIndex>,
    pub reference: Vec<f64>,
    pub cheap_a: Vec<f64>,
    pub cheap_b: Vec<f64>,
    pub natoms: usize,
    pub charge: i32,
    pub nconf: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MoleculeEnergies {
    pub fn relative(&self, method: Method) -> &[f64] {
        match method {
            Method::Reference => &self.reference,
            Method::CheapA => &self.cheap_a,
            Method::CheapB => &self.cheap_b,
        }
    }

    /// Number of non-minimum conformers.
    #[inline]
    pub fn len(&self) -> usize {
        self.conformer_index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conformer_index.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.conformer_index.len();
        self.reference.len() == n && self.cheap_a.len() == n && self.cheap_b.len() == n
    }

    pub fn metadata(&self) -> EnsembleMetadata {
        EnsembleMetadata {
            natoms: self.natoms,
            charge: self.charge,
            nconf: self.nconf,
            name: self.name.clone(),
        }
    }
}

/// The persisted result of a collection run: relative energies keyed by molecule id.
///
/// Molecules iterate in ascending id order, which keeps console output, reports and archive
/// numbering deterministic across reruns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyDatabase {
    pub methods: MethodSet,
    pub molecules: BTreeMap<MoleculeId, MoleculeEnergies>,
}

impl EnergyDatabase {
    pub fn new(methods: MethodSet) -> Self {
        Self {
            methods,
            molecules: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, id: MoleculeId, energies: MoleculeEnergies) -> Option<MoleculeEnergies> {
        self.molecules.insert(id, energies)
    }

    pub fn get(&self, id: MoleculeId) -> Option<&MoleculeEnergies> {
        self.molecules.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoleculeId, &MoleculeEnergies)> {
        self.molecules.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn first_molecule(&self) -> Option<MoleculeId> {
        self.molecules.keys().next().copied()
    }
}
