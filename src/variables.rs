//! Decision-variable assignment.
//!
//! Registers every decision variable of an instance and exposes one
//! strongly-typed lookup table per family:
//!
//! | Family | Key | Meaning |
//! |--------|-----|---------|
//! | `x[t,r]` | [`AssignKey`] | task `t` is assigned to robot `r` |
//! | `y[t,z]` | [`StartKey`] | task `t` starts at slot `z` |
//! | `w[t,r,z]` | [`OccupyKey`] | task `t` occupies robot `r` during slot `z` |
//!
//! Registration order is per task: all `x`, then all `y`, then all `w`
//! (robot-major), so handles are reproducible for a given instance.

use std::collections::HashMap;

use crate::error::QuboError;
use crate::models::{ProblemInstance, Slot};
use crate::registry::{AssignKey, OccupyKey, StartKey, VarKey, VariableRegistry};

/// Forward lookup tables for the three variable families.
#[derive(Debug, Clone, Default)]
pub struct VariableTables {
    pub assign: HashMap<AssignKey, usize>,
    pub start: HashMap<StartKey, usize>,
    pub occupy: HashMap<OccupyKey, usize>,
}

/// Reverse lookup tables (handle → identity) for decoding.
#[derive(Debug, Clone, Default)]
pub struct ReverseTables {
    pub assign: HashMap<usize, AssignKey>,
    pub start: HashMap<usize, StartKey>,
    pub occupy: HashMap<usize, OccupyKey>,
}

/// Registers every `x`, `y`, and `w` variable of `instance` in `registry`.
pub fn assign_variables(
    instance: &ProblemInstance,
    registry: &mut VariableRegistry,
) -> VariableTables {
    let mut tables = VariableTables::default();

    for task in &instance.tasks {
        for robot in &instance.robots {
            let key = AssignKey::new(task.name.as_str(), robot.as_str());
            let idx = registry.get(VarKey::Assign(key.clone()));
            tables.assign.insert(key, idx);
        }
        for &slot in &instance.slots {
            let key = StartKey::new(task.name.as_str(), slot);
            let idx = registry.get(VarKey::Start(key.clone()));
            tables.start.insert(key, idx);
        }
        for robot in &instance.robots {
            for &slot in &instance.slots {
                let key = OccupyKey::new(task.name.as_str(), robot.as_str(), slot);
                let idx = registry.get(VarKey::Occupy(key.clone()));
                tables.occupy.insert(key, idx);
            }
        }
    }

    tables
}

impl VariableTables {
    /// Handle of `x[task,robot]`.
    pub fn x(&self, task: &str, robot: &str) -> Result<usize, QuboError> {
        let key = AssignKey::new(task, robot);
        self.assign
            .get(&key)
            .copied()
            .ok_or(QuboError::UnknownVariable(VarKey::Assign(key)))
    }

    /// Handle of `y[task,slot]`.
    pub fn y(&self, task: &str, slot: Slot) -> Result<usize, QuboError> {
        let key = StartKey::new(task, slot);
        self.start
            .get(&key)
            .copied()
            .ok_or(QuboError::UnknownVariable(VarKey::Start(key)))
    }

    /// Handle of `w[task,robot,slot]`.
    pub fn w(&self, task: &str, robot: &str, slot: Slot) -> Result<usize, QuboError> {
        let key = OccupyKey::new(task, robot, slot);
        self.occupy
            .get(&key)
            .copied()
            .ok_or(QuboError::UnknownVariable(VarKey::Occupy(key)))
    }

    /// Total number of variables across families.
    pub fn len(&self) -> usize {
        self.assign.len() + self.start.len() + self.occupy.len()
    }

    /// Whether no variable is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inverts every table for decoding.
    pub fn reverse(&self) -> ReverseTables {
        ReverseTables {
            assign: invert(&self.assign),
            start: invert(&self.start),
            occupy: invert(&self.occupy),
        }
    }
}

fn invert<K: Clone>(table: &HashMap<K, usize>) -> HashMap<usize, K> {
    table.iter().map(|(k, &idx)| (idx, k.clone())).collect()
}
