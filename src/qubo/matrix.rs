//! Sparse QUBO coefficient accumulator.
//!
//! Entries are stored canonically as `(i, j)` with `i <= j`:
//! - `(i, i)` is the linear coefficient of `v_i` (valid because `v_i² = v_i`)
//! - `(i, j)`, `i < j`, is the coefficient of `v_i · v_j`
//!
//! Constants dropped from penalty expansions are kept in a separate
//! offset, so [`Qubo::energy`] reproduces every added term exactly.
//!
//! # Reference
//! Glover, Kochenberger & Du (2019), "Quantum Bridge Analytics I:
//! a tutorial on formulating and using QUBO models"

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::registry::VariableRegistry;

/// Default pruning threshold.
pub const DEFAULT_PRUNE_EPSILON: f64 = 1e-12;

/// Sparse upper-triangular coefficient map.
///
/// Handles are not validated here; the variable registry is the sole
/// authority for which handles exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qubo {
    entries: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

/// One stored coefficient, for export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuboEntry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Summary statistics of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuboStats {
    /// Number of variables the statistics refer to.
    pub num_variables: usize,
    /// Stored entries (linear + quadratic).
    pub num_entries: usize,
    /// Stored diagonal entries.
    pub num_linear: usize,
    /// Stored off-diagonal entries.
    pub num_quadratic: usize,
    /// `num_entries / (n (n + 1) / 2)`.
    pub density: f64,
}

/// Dense symmetric materialization of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix<L = String> {
    size: usize,
    values: Vec<f64>,
    labels: Option<Vec<L>>,
}

impl Qubo {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates `coeff` into the linear entry `(i, i)`.
    pub fn add_linear(&mut self, i: usize, coeff: f64) {
        *self.entries.entry((i, i)).or_insert(0.0) += coeff;
    }

    /// Accumulates `coeff` into the quadratic entry for `v_i · v_j`.
    ///
    /// The pair is canonicalized so the smaller handle comes first.
    /// When `i == j` the product is `v_i² = v_i`, so `coeff` lands on the
    /// linear entry; a caller that also calls [`Qubo::add_linear`] for the
    /// same term would count it twice.
    pub fn add_quadratic(&mut self, i: usize, j: usize, coeff: f64) {
        let key = if i <= j { (i, j) } else { (j, i) };
        *self.entries.entry(key).or_insert(0.0) += coeff;
    }

    /// Accumulates a constant into the offset.
    pub fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    /// Constant offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Stored coefficient for `(i, j)` in either order (0.0 if absent).
    pub fn coefficient(&self, i: usize, j: usize) -> f64 {
        let key = if i <= j { (i, j) } else { (j, i) };
        self.entries.get(&key).copied().unwrap_or(0.0)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in `(row, col)` order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    /// Stored entries as an exportable list.
    pub fn entries(&self) -> Vec<QuboEntry> {
        self.iter()
            .map(|((row, col), value)| QuboEntry { row, col, value })
            .collect()
    }

    /// Largest handle referenced by any entry.
    pub fn max_index(&self) -> Option<usize> {
        self.entries.keys().map(|&(_, j)| j).max()
    }

    /// Removes entries with `|value| < epsilon`. Returns how many were removed.
    ///
    /// The offset is never pruned.
    pub fn prune(&mut self, epsilon: f64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, v| v.abs() >= epsilon);
        before - self.entries.len()
    }

    /// Multiplies every coefficient and the offset by `factor`.
    pub fn scale(&mut self, factor: f64) {
        if factor == 1.0 {
            return;
        }
        for v in self.entries.values_mut() {
            *v *= factor;
        }
        self.offset *= factor;
    }

    /// Merges all entries and the offset of `other` into `self`.
    pub fn merge(&mut self, other: &Qubo) {
        for ((i, j), v) in other.iter() {
            self.add_quadratic(i, j, v);
        }
        self.offset += other.offset;
    }

    /// Statistics over a model of `size` variables.
    pub fn stats(&self, size: usize) -> QuboStats {
        let num_entries = self.entries.len();
        let num_linear = self.entries.keys().filter(|(i, j)| i == j).count();
        let max_upper = if size > 0 {
            (size * (size + 1)) as f64 / 2.0
        } else {
            1.0
        };
        QuboStats {
            num_variables: size,
            num_entries,
            num_linear,
            num_quadratic: num_entries - num_linear,
            density: num_entries as f64 / max_upper,
        }
    }

    /// Evaluates the model at a binary sample indexed by handle.
    ///
    /// Includes the offset. Handles beyond `sample` read as 0.
    pub fn energy(&self, sample: &[bool]) -> f64 {
        let bit = |h: usize| sample.get(h).copied().unwrap_or(false);
        self.iter()
            .filter(|&((i, j), _)| bit(i) && bit(j))
            .map(|(_, v)| v)
            .sum::<f64>()
            + self.offset
    }

    /// Materializes a dense symmetric `size × size` matrix.
    ///
    /// Entries with a handle `>= size` are skipped.
    pub fn materialize(&self, size: usize) -> DenseMatrix<String> {
        let mut values = vec![0.0; size * size];
        for ((i, j), v) in self.iter() {
            if j >= size {
                continue;
            }
            values[i * size + j] += v;
            if i != j {
                values[j * size + i] += v;
            }
        }
        DenseMatrix {
            size,
            values,
            labels: None,
        }
    }

    /// Materializes a dense matrix labeled with registry identities.
    ///
    /// Labels are attached only when the registry holds exactly `size`
    /// identities; otherwise the matrix is unlabeled.
    pub fn materialize_labeled<K>(
        &self,
        size: usize,
        registry: &VariableRegistry<K>,
    ) -> DenseMatrix<K>
    where
        K: Clone + Eq + Hash,
    {
        let dense = self.materialize(size);
        let labels = (registry.len() == size).then(|| registry.keys().to_vec());
        DenseMatrix {
            size,
            values: dense.values,
            labels,
        }
    }
}

impl<L> DenseMatrix<L> {
    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row >= size` or `col >= size`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.size && col < self.size,
            "index ({row}, {col}) out of range for {0}x{0} matrix",
            self.size
        );
        self.values[row * self.size + col]
    }

    /// Row slice.
    ///
    /// # Panics
    /// Panics if `row >= size`.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(
            row < self.size,
            "row {row} out of range for {0}x{0} matrix",
            self.size
        );
        &self.values[row * self.size..(row + 1) * self.size]
    }

    /// Row/column labels, if attached.
    pub fn labels(&self) -> Option<&[L]> {
        self.labels.as_deref()
    }

    /// Whether the matrix equals its transpose.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }
}
