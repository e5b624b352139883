//! Solution decoding.
//!
//! Maps a binary sample returned by an external solver back to the
//! chosen `x`, `y`, and `w` selections.

use serde::{Deserialize, Serialize};

use crate::registry::{AssignKey, OccupyKey, StartKey, VarKey};
use crate::variables::{ReverseTables, VariableTables};

/// Selected variables of a sample, grouped by family.
///
/// Each list is ordered by handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSample {
    /// Chosen `x[t,r]`.
    pub assignments: Vec<AssignKey>,
    /// Chosen `y[t,z]`.
    pub starts: Vec<StartKey>,
    /// Chosen `w[t,r,z]`.
    pub occupancies: Vec<OccupyKey>,
}

impl DecodedSample {
    /// All selections tagged with their family, in family order.
    pub fn tagged(&self) -> Vec<VarKey> {
        self.assignments
            .iter()
            .cloned()
            .map(VarKey::Assign)
            .chain(self.starts.iter().cloned().map(VarKey::Start))
            .chain(self.occupancies.iter().cloned().map(VarKey::Occupy))
            .collect()
    }

    /// Robots chosen for `task`.
    pub fn robots_of(&self, task: &str) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|k| k.task == task)
            .map(|k| k.robot.as_str())
            .collect()
    }

    /// Start slots chosen for `task`.
    pub fn starts_of(&self, task: &str) -> Vec<u32> {
        self.starts
            .iter()
            .filter(|k| k.task == task)
            .map(|k| k.slot)
            .collect()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.starts.is_empty() && self.occupancies.is_empty()
    }

    /// Handles of every selection, as a dense sample of `size` variables.
    ///
    /// Selections absent from `vars` are skipped.
    pub fn to_sample(&self, vars: &VariableTables, size: usize) -> Vec<bool> {
        let mut sample = vec![false; size];
        let handles = self
            .assignments
            .iter()
            .filter_map(|k| vars.assign.get(k))
            .chain(self.starts.iter().filter_map(|k| vars.start.get(k)))
            .chain(self.occupancies.iter().filter_map(|k| vars.occupy.get(k)));
        for &h in handles {
            if h < size {
                sample[h] = true;
            }
        }
        sample
    }
}

/// Decodes `(handle, value)` pairs.
///
/// Only value `1` selects. Handles unknown to every reverse table are
/// ignored. Values other than 0/1 are not validated.
pub fn decode_sample<I>(sample: I, reverse: &ReverseTables) -> DecodedSample
where
    I: IntoIterator<Item = (usize, u8)>,
{
    let mut selected: Vec<usize> = sample
        .into_iter()
        .filter(|&(_, v)| v == 1)
        .map(|(h, _)| h)
        .collect();
    selected.sort_unstable();
    selected.dedup();

    let mut decoded = DecodedSample::default();
    for h in selected {
        if let Some(k) = reverse.assign.get(&h) {
            decoded.assignments.push(k.clone());
        } else if let Some(k) = reverse.start.get(&h) {
            decoded.starts.push(k.clone());
        } else if let Some(k) = reverse.occupy.get(&h) {
            decoded.occupancies.push(k.clone());
        }
    }
    decoded
}

/// Decodes a dense binary sample indexed by handle.
pub fn decode_bits(sample: &[bool], reverse: &ReverseTables) -> DecodedSample {
    decode_sample(
        sample.iter().enumerate().map(|(h, &b)| (h, u8::from(b))),
        reverse,
    )
}
