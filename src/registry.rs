//! Variable registry: bijection between variable identities and dense handles.
//!
//! Handles are assigned in first-seen order starting at 0, with no gaps,
//! so a model over `len()` variables can be materialized densely.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::models::Slot;

/// Identity of an `x[t,r]` variable: task `t` is assigned to robot `r`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignKey {
    pub task: String,
    pub robot: String,
}

/// Identity of a `y[t,z]` variable: task `t` starts at slot `z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StartKey {
    pub task: String,
    pub slot: Slot,
}

/// Identity of a `w[t,r,z]` variable: task `t` occupies robot `r` during slot `z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupyKey {
    pub task: String,
    pub robot: String,
    pub slot: Slot,
}

impl AssignKey {
    pub fn new(task: impl Into<String>, robot: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            robot: robot.into(),
        }
    }
}

impl StartKey {
    pub fn new(task: impl Into<String>, slot: Slot) -> Self {
        Self {
            task: task.into(),
            slot,
        }
    }
}

impl OccupyKey {
    pub fn new(task: impl Into<String>, robot: impl Into<String>, slot: Slot) -> Self {
        Self {
            task: task.into(),
            robot: robot.into(),
            slot,
        }
    }
}

/// Tagged variable identity, one variant per decision-variable family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VarKey {
    /// `x[t,r]`
    Assign(AssignKey),
    /// `y[t,z]`
    Start(StartKey),
    /// `w[t,r,z]`
    Occupy(OccupyKey),
}

impl VarKey {
    /// Family tag (`'x'`, `'y'`, or `'w'`).
    pub fn family(&self) -> char {
        match self {
            Self::Assign(_) => 'x',
            Self::Start(_) => 'y',
            Self::Occupy(_) => 'w',
        }
    }

    /// Task the variable belongs to.
    pub fn task(&self) -> &str {
        match self {
            Self::Assign(k) => &k.task,
            Self::Start(k) => &k.task,
            Self::Occupy(k) => &k.task,
        }
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign(k) => write!(f, "x[{},{}]", k.task, k.robot),
            Self::Start(k) => write!(f, "y[{},{}]", k.task, k.slot),
            Self::Occupy(k) => write!(f, "w[{},{},{}]", k.task, k.robot, k.slot),
        }
    }
}

/// Bijective map from variable identity to dense handle.
///
/// Single-writer: the registry is owned by one model-construction pass.
/// There is no removal; a handle, once issued, is valid for the
/// registry's lifetime.
#[derive(Debug, Clone)]
pub struct VariableRegistry<K = VarKey> {
    to_index: HashMap<K, usize>,
    from_index: Vec<K>,
}

impl<K: Clone + Eq + Hash> Default for VariableRegistry<K> {
    fn default() -> Self {
        Self {
            to_index: HashMap::new(),
            from_index: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> VariableRegistry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `key`, assigning the next free one on first sight.
    ///
    /// Repeated calls with an equal key return the same handle.
    pub fn get(&mut self, key: K) -> usize {
        if let Some(&idx) = self.to_index.get(&key) {
            return idx;
        }
        let idx = self.from_index.len();
        self.from_index.push(key.clone());
        self.to_index.insert(key, idx);
        idx
    }

    /// Returns the handle for `key` without registering it.
    pub fn find(&self, key: &K) -> Option<usize> {
        self.to_index.get(key).copied()
    }

    /// Returns the identity behind `handle`, if it was issued.
    pub fn reverse(&self, handle: usize) -> Option<&K> {
        self.from_index.get(handle)
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.from_index.len()
    }

    /// Whether no identity has been registered.
    pub fn is_empty(&self) -> bool {
        self.from_index.is_empty()
    }

    /// Identities in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &K)> {
        self.from_index.iter().enumerate()
    }

    /// Identities in handle order, as a slice indexed by handle.
    pub fn keys(&self) -> &[K] {
        &self.from_index
    }
}
