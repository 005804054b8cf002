use super::ids::ConformerIndex;
use super::method::Method;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnsembleError {
    #[error(
        "Parallel arrays differ in length (indices: {indices}, reference: {reference}, cheap-a: {cheap_a}, cheap-b: {cheap_b})"
    )]
    LengthMismatch {
        indices: usize,
        reference: usize,
        cheap_a: usize,
        cheap_b: usize,
    },
}

/// The three method energies of a single conformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConformerEnergies {
    pub reference: f64,
    pub cheap_a: f64,
    pub cheap_b: f64,
}

impl ConformerEnergies {
    pub fn new(reference: f64, cheap_a: f64, cheap_b: f64) -> Self {
        Self {
            reference,
            cheap_a,
            cheap_b,
        }
    }

    pub fn get(&self, method: Method) -> f64 {
        match method {
            Method::Reference => self.reference,
            Method::CheapA => self.cheap_a,
            Method::CheapB => self.cheap_b,
        }
    }
}

/// A conformer ensemble of one molecule, stored as four aligned arrays: original conformer
/// indices and one energy vector per method.
///
/// Fields are private so that no caller can reorder or shrink one array without the others.
/// Every mutating operation (`push`, `remove`, `sort_by_reference`) applies the same change
/// to all four arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConformerEnsemble {
    indices: Vec<ConformerIndex>,
    reference: Vec<f64>,
    cheap_a: Vec<f64>,
    cheap_b: Vec<f64>,
}

impl ConformerEnsemble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            reference: Vec::with_capacity(capacity),
            cheap_a: Vec::with_capacity(capacity),
            cheap_b: Vec::with_capacity(capacity),
        }
    }

    pub fn from_parts(
        indices: Vec<ConformerIndex>,
        reference: Vec<f64>,
        cheap_a: Vec<f64>,
        cheap_b: Vec<f64>,
    ) -> Result<Self, EnsembleError> {
        let n = indices.len();
        if reference.len() != n || cheap_a.len() != n || cheap_b.len() != n {
            return Err(EnsembleError::LengthMismatch {
                indices: n,
                reference: reference.len(),
                cheap_a: cheap_a.len(),
                cheap_b: cheap_b.len(),
            });
        }
        Ok(Self {
            indices,
            reference,
            cheap_a,
            cheap_b,
        })
    }

    pub fn push(&mut self, index: ConformerIndex, energies: ConformerEnergies) {
        self.indices.push(index);
        self.reference.push(energies.reference);
        self.cheap_a.push(energies.cheap_a);
        self.cheap_b.push(energies.cheap_b);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[ConformerIndex] {
        &self.indices
    }

    pub fn energies(&self, method: Method) -> &[f64] {
        match method {
            Method::Reference => &self.reference,
            Method::CheapA => &self.cheap_a,
            Method::CheapB => &self.cheap_b,
        }
    }

    pub fn get(&self, position: usize) -> Option<(ConformerIndex, ConformerEnergies)> {
        let index = *self.indices.get(position)?;
        Some((
            index,
            ConformerEnergies::new(
                self.reference[position],
                self.cheap_a[position],
                self.cheap_b[position],
            ),
        ))
    }

    /// Removes the conformer at `position` from all four arrays.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds, like [`Vec::remove`].
    pub fn remove(&mut self, position: usize) -> (ConformerIndex, ConformerEnergies) {
        let index = self.indices.remove(position);
        let energies = ConformerEnergies::new(
            self.reference.remove(position),
            self.cheap_a.remove(position),
            self.cheap_b.remove(position),
        );
        (index, energies)
    }

    /// Stable ascending sort of all four arrays by the reference energy.
    ///
    /// Equal reference energies keep their relative input order. Ordering follows
    /// [`f64::total_cmp`], so a positive NaN sorts after every finite value.
    pub fn sort_by_reference(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.reference[a].total_cmp(&self.reference[b]));

        self.indices = order.iter().map(|&i| self.indices[i]).collect();
        self.reference = order.iter().map(|&i| self.reference[i]).collect();
        self.cheap_a = order.iter().map(|&i| self.cheap_a[i]).collect();
        self.cheap_b = order.iter().map(|&i| self.cheap_b[i]).collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConformerIndex, ConformerEnergies)> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}
